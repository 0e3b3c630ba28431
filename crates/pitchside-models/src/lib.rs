pub mod config;
pub mod contract;
pub mod eligibility;
pub mod message;
pub mod pitch;
pub mod player;
pub mod schema;
pub mod session;
pub mod shortlist;
pub mod team;
pub mod video;

pub use config::{ContractsConfig, PitchsideConfig, ServiceConfig, StoreConfig};
pub use contract::{ContractArtifact, ContractTerms};
pub use eligibility::{EligibilityReport, IneligibilityReason};
pub use message::{Conversation, Message};
pub use pitch::{
    Currency, Pitch, PitchDraft, PitchStatus, TransferType, MAX_TAGGED_VIDEOS, MIN_TAGGED_VIDEOS,
};
pub use player::{Player, PlayerField};
pub use schema::{object_paths, MARKET_SCHEMA_DDL};
pub use session::{Principal, Session};
pub use shortlist::{Priority, ShortlistEntry};
pub use team::{Agent, SubscriptionStatus, SubscriptionTier, Team, TeamRequirements};
pub use video::Video;
