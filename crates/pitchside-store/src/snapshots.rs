use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Utc};
use moka::future::Cache;
use uuid::Uuid;

use pitchside_models::TeamRequirements;

use crate::error::StoreError;
use crate::sqlite::MarketDb;

/// Start of the UTC calendar month containing `now`. The monthly pitch
/// quota window resets at this boundary.
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    let first = now
        .date_naive()
        .with_day(1)
        .unwrap_or_else(|| now.date_naive());
    Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
}

/// Read-through cache for team requirement snapshots: checks moka (hot) →
/// SQLite aggregation → None.
///
/// On an aggregation hit, promotes the snapshot to the moka hot cache for
/// subsequent fast access. Reads may be up to one TTL stale; mutation paths
/// call `invalidate`, and submission paths use `fetch_fresh` so a decision
/// is never made against a cached snapshot.
pub struct SnapshotReader {
    db: Arc<MarketDb>,
    hot: Cache<Uuid, TeamRequirements>,
}

impl SnapshotReader {
    pub fn new(db: Arc<MarketDb>, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            db,
            hot: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get a team's requirement snapshot, possibly cached.
    pub async fn get(&self, team_id: Uuid) -> Result<Option<TeamRequirements>, StoreError> {
        if let Some(snapshot) = self.hot.get(&team_id).await {
            return Ok(Some(snapshot));
        }

        let snapshot = self.db.team_requirements(team_id, month_start(Utc::now()))?;
        if let Some(snapshot) = snapshot {
            self.hot.insert(team_id, snapshot.clone()).await;
            return Ok(Some(snapshot));
        }

        Ok(None)
    }

    /// Drop any cached snapshot and rebuild from the database. Submission
    /// paths use this so quota and library counts are authoritative.
    pub async fn fetch_fresh(&self, team_id: Uuid) -> Result<Option<TeamRequirements>, StoreError> {
        self.hot.invalidate(&team_id).await;

        let snapshot = self.db.team_requirements(team_id, month_start(Utc::now()))?;
        if let Some(snapshot) = snapshot {
            self.hot.insert(team_id, snapshot.clone()).await;
            return Ok(Some(snapshot));
        }

        Ok(None)
    }

    /// Invalidate after any mutation that affects the snapshot (videos,
    /// pitches, subscription, contact warnings).
    pub async fn invalidate(&self, team_id: Uuid) {
        self.hot.invalidate(&team_id).await;
    }

    /// Number of snapshots currently held in the hot cache.
    pub fn hot_count(&self) -> u64 {
        self.hot.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use pitchside_models::team::{SubscriptionStatus, SubscriptionTier};
    use pitchside_models::{Team, Video};

    use super::*;

    fn seed_team(db: &MarketDb) -> Uuid {
        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            name: "Harbour City FC".to_string(),
            member_association: Some("NFF".to_string()),
            tier: SubscriptionTier::Basic,
            status: SubscriptionStatus::Active,
            contact_warnings: 0,
            monthly_pitch_quota: 5,
            created_at: now,
            updated_at: now,
        };
        db.insert_team(&team).unwrap();
        team.id
    }

    fn seed_video(db: &MarketDb, team_id: Uuid) {
        db.insert_video(&Video {
            id: Uuid::new_v4(),
            team_id,
            title: "Matchday highlights".to_string(),
            object_path: format!("videos/{team_id}/{}.mp4", Uuid::new_v4()),
            duration_seconds: Some(90),
            created_at: Utc::now(),
        })
        .unwrap();
    }

    #[test]
    fn month_start_truncates_to_first_midnight() {
        let mid = Utc.with_ymd_and_hms(2024, 6, 17, 15, 42, 9).unwrap();
        assert_eq!(
            month_start(mid),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );

        let first = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(month_start(first), first);
    }

    #[tokio::test]
    async fn read_through_promotes_to_hot() {
        let db = Arc::new(MarketDb::open_in_memory().unwrap());
        let team_id = seed_team(&db);
        seed_video(&db, team_id);

        let reader = SnapshotReader::new(db.clone(), 100, Duration::from_secs(60));
        let snapshot = reader.get(team_id).await.unwrap().unwrap();
        assert_eq!(snapshot.video_count, 1);

        // A write the reader doesn't know about stays invisible until
        // invalidation.
        seed_video(&db, team_id);
        let cached = reader.get(team_id).await.unwrap().unwrap();
        assert_eq!(cached.video_count, 1);

        reader.invalidate(team_id).await;
        let fresh = reader.get(team_id).await.unwrap().unwrap();
        assert_eq!(fresh.video_count, 2);
    }

    #[tokio::test]
    async fn fetch_fresh_bypasses_cached_snapshot() {
        let db = Arc::new(MarketDb::open_in_memory().unwrap());
        let team_id = seed_team(&db);

        let reader = SnapshotReader::new(db.clone(), 100, Duration::from_secs(60));
        let stale = reader.get(team_id).await.unwrap().unwrap();
        assert_eq!(stale.video_count, 0);

        seed_video(&db, team_id);
        let fresh = reader.fetch_fresh(team_id).await.unwrap().unwrap();
        assert_eq!(fresh.video_count, 1);
    }

    #[tokio::test]
    async fn missing_team_is_not_cached() {
        let db = Arc::new(MarketDb::open_in_memory().unwrap());
        let reader = SnapshotReader::new(db.clone(), 100, Duration::from_secs(60));

        let team_id = Uuid::new_v4();
        assert!(reader.get(team_id).await.unwrap().is_none());
        assert_eq!(reader.hot_count(), 0);
    }

    #[tokio::test]
    async fn ttl_expiry_forces_refetch() {
        let db = Arc::new(MarketDb::open_in_memory().unwrap());
        let team_id = seed_team(&db);

        let reader = SnapshotReader::new(db.clone(), 100, Duration::from_millis(50));
        let first = reader.get(team_id).await.unwrap().unwrap();
        assert_eq!(first.video_count, 0);

        seed_video(&db, team_id);
        tokio::time::sleep(Duration::from_millis(100)).await;

        let refreshed = reader.get(team_id).await.unwrap().unwrap();
        assert_eq!(refreshed.video_count, 1);
    }
}
