use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A highlight or match video in a team's library. The uploaded file lives
/// in the object store; this row carries its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    /// Object-store path of the uploaded file.
    pub object_path: String,
    pub duration_seconds: Option<u32>,
    pub created_at: DateTime<Utc>,
}
