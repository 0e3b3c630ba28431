use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated party behind a request. Every service operation takes
/// a session; authorization checks compare its principal against record
/// ownership.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Principal {
    Team(Uuid),
    Agent(Uuid),
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Team(id) | Self::Agent(id) => *id,
        }
    }

    pub fn is_team(&self) -> bool {
        matches!(self, Self::Team(_))
    }

    pub fn is_agent(&self) -> bool {
        matches!(self, Self::Agent(_))
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team(id) => write!(f, "team:{id}"),
            Self::Agent(id) => write!(f, "agent:{id}"),
        }
    }
}

/// Session-scoped identity, as the hosted auth layer would hand it to us.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub principal: Principal,
}

impl Session {
    pub fn team(id: Uuid) -> Self {
        Self {
            principal: Principal::Team(id),
        }
    }

    pub fn agent(id: Uuid) -> Self {
        Self {
            principal: Principal::Agent(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_accessors() {
        let id = Uuid::new_v4();
        let session = Session::team(id);
        assert!(session.principal.is_team());
        assert!(!session.principal.is_agent());
        assert_eq!(session.principal.id(), id);
        assert_eq!(session.principal.to_string(), format!("team:{id}"));
    }

    #[test]
    fn principal_serializes_tagged() {
        let id = Uuid::parse_str("3f9c2b44-7a61-4a8e-9d2f-1c5e8b0a6d17").unwrap();
        let json = serde_json::to_string(&Principal::Agent(id)).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"agent","id":"3f9c2b44-7a61-4a8e-9d2f-1c5e8b0a6d17"}"#
        );

        let back: Principal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Principal::Agent(id));
    }
}
