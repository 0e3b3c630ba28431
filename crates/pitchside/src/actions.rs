use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use thiserror::Error;

/// Lifecycle of one user-triggered action.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ActionState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed {
        reason: String,
    },
}

/// Returned by [`ActionGate::begin`] while an earlier permit is unresolved.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("action is already running")]
pub struct AlreadyRunning;

/// Double-submit guard around a single action.
///
/// One gate tracks one action (e.g. "create pitch"). `begin` claims the gate
/// and hands back a permit; until that permit is resolved or dropped, further
/// `begin` calls fail with [`AlreadyRunning`]. Clones share state, so the
/// task driving the action and the surface polling it can hold the same gate.
#[derive(Debug, Clone, Default)]
pub struct ActionGate {
    state: Arc<Mutex<ActionState>>,
}

impl ActionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state. Succeeded and Failed persist until the next `begin`.
    pub fn state(&self) -> ActionState {
        self.lock().clone()
    }

    /// Claim the gate. A gate left in Succeeded or Failed re-arms here.
    pub fn begin(&self) -> Result<ActionPermit, AlreadyRunning> {
        let mut state = self.lock();
        if *state == ActionState::Running {
            return Err(AlreadyRunning);
        }
        *state = ActionState::Running;
        Ok(ActionPermit {
            gate: self.clone(),
            resolved: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, ActionState> {
        // A panic mid-action resolves through the permit's Drop, so a
        // poisoned lock still holds a coherent state.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Proof of an in-flight action. Consuming it with [`succeed`] or [`fail`]
/// records the outcome; dropping it unresolved returns the gate to Idle,
/// which is what happens when the driving task is cancelled.
///
/// [`succeed`]: ActionPermit::succeed
/// [`fail`]: ActionPermit::fail
#[derive(Debug)]
pub struct ActionPermit {
    gate: ActionGate,
    resolved: bool,
}

impl ActionPermit {
    pub fn succeed(mut self) {
        *self.gate.lock() = ActionState::Succeeded;
        self.resolved = true;
    }

    pub fn fail(mut self, reason: impl Into<String>) {
        *self.gate.lock() = ActionState::Failed {
            reason: reason.into(),
        };
        self.resolved = true;
    }
}

impl Drop for ActionPermit {
    fn drop(&mut self) {
        if !self.resolved {
            *self.gate.lock() = ActionState::Idle;
        }
    }
}
