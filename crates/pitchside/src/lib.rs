//! Pitchside - a player transfer marketplace
//!
//! Teams pitch players to intermediary agents with video evidence and an
//! asking price; agents browse, shortlist and negotiate through screened
//! conversations, exchanging generated contract documents.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use pitchside::models::{PitchDraft, PitchsideConfig, Session};
//! use pitchside::{build_marketplace, Marketplace, PitchFilter, PitchSort};
//! ```

pub use pitchside_contracts as contracts;
pub use pitchside_models as models;
pub use pitchside_rules as rules;
pub use pitchside_store as store;

pub mod actions;
pub mod error;
pub mod listing;
pub mod seed;
pub mod service;
pub mod views;

pub use actions::{ActionGate, ActionPermit, ActionState, AlreadyRunning};
pub use error::MarketError;
pub use listing::{Page, PitchFilter, PitchSort};
pub use seed::{SeedFile, SeedSummary};
pub use service::Marketplace;
pub use views::{PitchView, RosterEntry, ShortlistView};

use pitchside_models::PitchsideConfig;
use pitchside_store::{MarketDb, ObjectStore};

/// Build a Marketplace from configuration: open (or create) the SQLite
/// database and the object-store root.
pub fn build_marketplace(config: &PitchsideConfig) -> Result<Marketplace, MarketError> {
    let db = MarketDb::open(&config.store.sqlite_path)?;
    let objects = ObjectStore::open(&config.store.objects_path)?;
    Ok(Marketplace::new(db, objects, config.clone()))
}
