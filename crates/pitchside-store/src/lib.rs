pub mod error;
pub mod objects;
pub mod snapshots;
pub mod sqlite;

pub use error::StoreError;
pub use objects::ObjectStore;
pub use snapshots::{month_start, SnapshotReader};
pub use sqlite::MarketDb;
