use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use uuid::Uuid;

use pitchside_models::pitch::{Currency, Pitch, PitchStatus, TransferType};
use pitchside_models::schema::MARKET_SCHEMA_DDL;
use pitchside_models::team::{SubscriptionStatus, SubscriptionTier};
use pitchside_models::{
    Agent, Conversation, Message, Player, Priority, Principal, ShortlistEntry, Team,
    TeamRequirements, Video,
};

use crate::error::StoreError;

/// Read-write accessor for the market database.
///
/// Stands in for the hosted backend: row-shaped reads and writes keyed by
/// identifiers, no business rules. Access is synchronized via `Mutex` since
/// `rusqlite::Connection` is not `Sync`.
pub struct MarketDb {
    conn: Mutex<Connection>,
}

impl MarketDb {
    /// Open (or create) the market database file. Creates the schema if it
    /// doesn't exist and enables WAL mode for concurrent readers.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(MARKET_SCHEMA_DDL)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(MARKET_SCHEMA_DDL)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("SQLite mutex poisoned: {e}")))
    }

    // ---- teams ----

    pub fn insert_team(&self, team: &Team) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO teams \
             (id, name, member_association, tier, status, contact_warnings, monthly_pitch_quota, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                team.id.to_string(),
                team.name,
                team.member_association,
                team.tier.as_str(),
                team.status.as_str(),
                team.contact_warnings,
                team.monthly_pitch_quota,
                team.created_at.to_rfc3339(),
                team.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_team(&self, id: Uuid) -> Result<Option<Team>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, member_association, tier, status, contact_warnings, monthly_pitch_quota, created_at, updated_at \
             FROM teams WHERE id = ?1",
        )?;
        let result = stmt.query_row(rusqlite::params![id.to_string()], map_team);
        match result {
            Ok(team) => Ok(Some(team)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    pub fn update_subscription(
        &self,
        team_id: Uuid,
        tier: SubscriptionTier,
        status: SubscriptionStatus,
        monthly_pitch_quota: u32,
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE teams SET tier = ?2, status = ?3, monthly_pitch_quota = ?4, updated_at = ?5 \
             WHERE id = ?1",
            rusqlite::params![
                team_id.to_string(),
                tier.as_str(),
                status.as_str(),
                monthly_pitch_quota,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("team", team_id));
        }
        Ok(())
    }

    /// Increment a team's contact-warning count and return the new total.
    pub fn bump_contact_warnings(&self, team_id: Uuid) -> Result<u32, StoreError> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE teams SET contact_warnings = contact_warnings + 1, updated_at = ?2 \
             WHERE id = ?1",
            rusqlite::params![team_id.to_string(), Utc::now().to_rfc3339()],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("team", team_id));
        }
        let warnings: u32 = conn.query_row(
            "SELECT contact_warnings FROM teams WHERE id = ?1",
            rusqlite::params![team_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(warnings)
    }

    // ---- agents ----

    pub fn insert_agent(&self, agent: &Agent) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO agents (id, name, agency, member_association, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                agent.id.to_string(),
                agent.name,
                agent.agency,
                agent.member_association,
                agent.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_agent(&self, id: Uuid) -> Result<Option<Agent>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, name, agency, member_association, created_at FROM agents WHERE id = ?1",
        )?;
        let result = stmt.query_row(rusqlite::params![id.to_string()], map_agent);
        match result {
            Ok(agent) => Ok(Some(agent)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    // ---- players ----

    pub fn insert_player(&self, player: &Player) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO players \
             (id, team_id, full_name, position, citizenship, date_of_birth, height_cm, weight_kg, bio, market_value, photo_path, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            rusqlite::params![
                player.id.to_string(),
                player.team_id.to_string(),
                player.full_name,
                player.position,
                player.citizenship,
                player.date_of_birth.map(|d| d.to_string()),
                player.height_cm,
                player.weight_kg,
                player.bio,
                player.market_value.map(|v| v.to_string()),
                player.photo_path,
                player.created_at.to_rfc3339(),
                player.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_player(&self, id: Uuid) -> Result<Option<Player>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, team_id, full_name, position, citizenship, date_of_birth, height_cm, weight_kg, bio, market_value, photo_path, created_at, updated_at \
             FROM players WHERE id = ?1",
        )?;
        let result = stmt.query_row(rusqlite::params![id.to_string()], map_player);
        match result {
            Ok(player) => Ok(Some(player)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    pub fn list_players(&self, team_id: Uuid) -> Result<Vec<Player>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, team_id, full_name, position, citizenship, date_of_birth, height_cm, weight_kg, bio, market_value, photo_path, created_at, updated_at \
             FROM players WHERE team_id = ?1 ORDER BY full_name",
        )?;
        let players = stmt
            .query_map(rusqlite::params![team_id.to_string()], map_player)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(players)
    }

    /// Guarded update: only applies when the stored `updated_at` still equals
    /// `expected_updated_at`. A concurrent edit surfaces as `Conflict`, never
    /// as a silent clobber.
    pub fn update_player(
        &self,
        player: &Player,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE players SET full_name = ?2, position = ?3, citizenship = ?4, date_of_birth = ?5, \
             height_cm = ?6, weight_kg = ?7, bio = ?8, market_value = ?9, photo_path = ?10, updated_at = ?11 \
             WHERE id = ?1 AND updated_at = ?12",
            rusqlite::params![
                player.id.to_string(),
                player.full_name,
                player.position,
                player.citizenship,
                player.date_of_birth.map(|d| d.to_string()),
                player.height_cm,
                player.weight_kg,
                player.bio,
                player.market_value.map(|v| v.to_string()),
                player.photo_path,
                player.updated_at.to_rfc3339(),
                expected_updated_at.to_rfc3339(),
            ],
        )?;
        if affected == 0 {
            let exists = match conn.query_row(
                "SELECT 1 FROM players WHERE id = ?1",
                rusqlite::params![player.id.to_string()],
                |_| Ok(()),
            ) {
                Ok(()) => true,
                Err(rusqlite::Error::QueryReturnedNoRows) => false,
                Err(e) => return Err(StoreError::Sqlite(e)),
            };
            if exists {
                return Err(StoreError::Conflict(format!(
                    "player {} was modified since it was read",
                    player.id
                )));
            }
            return Err(StoreError::not_found("player", player.id));
        }
        Ok(())
    }

    pub fn delete_player(&self, id: Uuid) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM players WHERE id = ?1",
            rusqlite::params![id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("player", id));
        }
        Ok(())
    }

    // ---- videos ----

    pub fn insert_video(&self, video: &Video) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO videos (id, team_id, title, object_path, duration_seconds, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                video.id.to_string(),
                video.team_id.to_string(),
                video.title,
                video.object_path,
                video.duration_seconds,
                video.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_video(&self, id: Uuid) -> Result<Option<Video>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, team_id, title, object_path, duration_seconds, created_at \
             FROM videos WHERE id = ?1",
        )?;
        let result = stmt.query_row(rusqlite::params![id.to_string()], map_video);
        match result {
            Ok(video) => Ok(Some(video)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    /// Fetch the videos that still exist among `ids`. Dangling identifiers
    /// are skipped; callers decide whether that matters.
    pub fn get_videos(&self, ids: &[Uuid]) -> Result<Vec<Video>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, team_id, title, object_path, duration_seconds, created_at \
             FROM videos WHERE id = ?1",
        )?;
        let mut videos = Vec::with_capacity(ids.len());
        for id in ids {
            match stmt.query_row(rusqlite::params![id.to_string()], map_video) {
                Ok(video) => videos.push(video),
                Err(rusqlite::Error::QueryReturnedNoRows) => {}
                Err(e) => return Err(StoreError::Sqlite(e)),
            }
        }
        Ok(videos)
    }

    pub fn list_videos(&self, team_id: Uuid) -> Result<Vec<Video>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, team_id, title, object_path, duration_seconds, created_at \
             FROM videos WHERE team_id = ?1 ORDER BY created_at DESC",
        )?;
        let videos = stmt
            .query_map(rusqlite::params![team_id.to_string()], map_video)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(videos)
    }

    pub fn count_videos(&self, team_id: Uuid) -> Result<u32, StoreError> {
        let conn = self.conn()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM videos WHERE team_id = ?1",
            rusqlite::params![team_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete_video(&self, id: Uuid) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM videos WHERE id = ?1",
            rusqlite::params![id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("video", id));
        }
        Ok(())
    }

    // ---- pitches ----

    pub fn insert_pitch(&self, pitch: &Pitch) -> Result<(), StoreError> {
        let tagged = serde_json::to_string(&pitch.tagged_video_ids)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO pitches \
             (id, team_id, player_id, transfer_type, asking_price, currency, international, tagged_video_ids, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                pitch.id.to_string(),
                pitch.team_id.to_string(),
                pitch.player_id.to_string(),
                pitch.transfer_type.as_str(),
                pitch.asking_price.to_string(),
                pitch.currency.code(),
                pitch.international,
                tagged,
                pitch.status.as_str(),
                pitch.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_pitch(&self, id: Uuid) -> Result<Option<Pitch>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, team_id, player_id, transfer_type, asking_price, currency, international, tagged_video_ids, status, created_at \
             FROM pitches WHERE id = ?1",
        )?;
        let result = stmt.query_row(rusqlite::params![id.to_string()], map_pitch);
        match result {
            Ok(pitch) => Ok(Some(pitch)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    pub fn list_active_pitches(&self) -> Result<Vec<Pitch>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, team_id, player_id, transfer_type, asking_price, currency, international, tagged_video_ids, status, created_at \
             FROM pitches WHERE status = 'active' ORDER BY created_at DESC",
        )?;
        let pitches = stmt
            .query_map([], map_pitch)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pitches)
    }

    pub fn list_team_pitches(&self, team_id: Uuid) -> Result<Vec<Pitch>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, team_id, player_id, transfer_type, asking_price, currency, international, tagged_video_ids, status, created_at \
             FROM pitches WHERE team_id = ?1 ORDER BY created_at DESC",
        )?;
        let pitches = stmt
            .query_map(rusqlite::params![team_id.to_string()], map_pitch)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pitches)
    }

    /// Count pitches a team created at or after `since`, regardless of their
    /// current status. Withdrawn pitches still consumed quota.
    pub fn count_pitches_since(
        &self,
        team_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<u32, StoreError> {
        let conn = self.conn()?;
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM pitches WHERE team_id = ?1 AND created_at >= ?2",
            rusqlite::params![team_id.to_string(), since.to_rfc3339()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn set_pitch_status(&self, id: Uuid, status: PitchStatus) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "UPDATE pitches SET status = ?2 WHERE id = ?1",
            rusqlite::params![id.to_string(), status.as_str()],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("pitch", id));
        }
        Ok(())
    }

    // ---- conversations & messages ----

    pub fn insert_conversation(&self, conversation: &Conversation) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO conversations (id, pitch_id, team_id, agent_id, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                conversation.id.to_string(),
                conversation.pitch_id.to_string(),
                conversation.team_id.to_string(),
                conversation.agent_id.to_string(),
                conversation.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_conversation(&self, id: Uuid) -> Result<Option<Conversation>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, pitch_id, team_id, agent_id, created_at FROM conversations WHERE id = ?1",
        )?;
        let result = stmt.query_row(rusqlite::params![id.to_string()], map_conversation);
        match result {
            Ok(conversation) => Ok(Some(conversation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    pub fn find_conversation(
        &self,
        pitch_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Option<Conversation>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, pitch_id, team_id, agent_id, created_at \
             FROM conversations WHERE pitch_id = ?1 AND agent_id = ?2",
        )?;
        let result = stmt.query_row(
            rusqlite::params![pitch_id.to_string(), agent_id.to_string()],
            map_conversation,
        );
        match result {
            Ok(conversation) => Ok(Some(conversation)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }

    pub fn insert_message(&self, message: &Message) -> Result<(), StoreError> {
        let (sender_kind, sender_id) = match message.sender {
            Principal::Team(id) => ("team", id),
            Principal::Agent(id) => ("agent", id),
        };
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO messages (id, conversation_id, sender_kind, sender_id, body, attachment_path, sent_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                message.id.to_string(),
                message.conversation_id.to_string(),
                sender_kind,
                sender_id.to_string(),
                message.body,
                message.attachment_path,
                message.sent_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, conversation_id, sender_kind, sender_id, body, attachment_path, sent_at \
             FROM messages WHERE conversation_id = ?1 ORDER BY sent_at, id",
        )?;
        let messages = stmt
            .query_map(rusqlite::params![conversation_id.to_string()], map_message)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(messages)
    }

    // ---- shortlist ----

    /// Insert a shortlist entry, or update note/priority in place when the
    /// agent already saved this pitch. The original id and added_at survive.
    pub fn upsert_shortlist(&self, entry: &ShortlistEntry) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO shortlist (id, agent_id, pitch_id, priority, note, added_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT (agent_id, pitch_id) \
             DO UPDATE SET priority = excluded.priority, note = excluded.note",
            rusqlite::params![
                entry.id.to_string(),
                entry.agent_id.to_string(),
                entry.pitch_id.to_string(),
                entry.priority.as_str(),
                entry.note,
                entry.added_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn remove_shortlist(&self, agent_id: Uuid, pitch_id: Uuid) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let affected = conn.execute(
            "DELETE FROM shortlist WHERE agent_id = ?1 AND pitch_id = ?2",
            rusqlite::params![agent_id.to_string(), pitch_id.to_string()],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("shortlist entry", pitch_id));
        }
        Ok(())
    }

    pub fn list_shortlist(&self, agent_id: Uuid) -> Result<Vec<ShortlistEntry>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, agent_id, pitch_id, priority, note, added_at \
             FROM shortlist WHERE agent_id = ?1 ORDER BY added_at DESC",
        )?;
        let entries = stmt
            .query_map(rusqlite::params![agent_id.to_string()], map_shortlist)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ---- requirement snapshots ----

    /// Build a team's requirement snapshot in one query pass. Video and
    /// pitch counts are derived from rows, never from stored counters.
    pub fn team_requirements(
        &self,
        team_id: Uuid,
        month_start: DateTime<Utc>,
    ) -> Result<Option<TeamRequirements>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT t.tier, t.status, t.contact_warnings, t.monthly_pitch_quota, \
             (SELECT COUNT(*) FROM videos v WHERE v.team_id = t.id), \
             (SELECT COUNT(*) FROM pitches p WHERE p.team_id = t.id AND p.created_at >= ?2) \
             FROM teams t WHERE t.id = ?1",
        )?;
        let result = stmt.query_row(
            rusqlite::params![team_id.to_string(), month_start.to_rfc3339()],
            |row| {
                let tier: String = row.get(0)?;
                let status: String = row.get(1)?;
                Ok(TeamRequirements {
                    team_id,
                    tier: tier_or_default(&tier),
                    status: status_or_default(&status),
                    contact_warnings: row.get(2)?,
                    monthly_pitch_quota: row.get(3)?,
                    video_count: row.get(4)?,
                    pitches_this_month: row.get(5)?,
                    fetched_at: Utc::now(),
                })
            },
        );
        match result {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Sqlite(e)),
        }
    }
}

// ---- row mapping ----
//
// Unknown tier/status/priority values read back as their documented defaults
// with a warning; they come from hand-edited or newer-schema databases.
// Everything else in these tables is written only by this crate, so a value
// that fails to parse is treated as a conversion error.

fn conv_err<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn bad_value(idx: usize, detail: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, detail.into())
}

fn get_uuid(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conv_err(idx, e))
}

fn get_datetime(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conv_err(idx, e))
}

fn get_opt_date(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) => s.parse::<NaiveDate>().map(Some).map_err(|e| conv_err(idx, e)),
        None => Ok(None),
    }
}

fn get_opt_decimal(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(s) => s.parse::<Decimal>().map(Some).map_err(|e| conv_err(idx, e)),
        None => Ok(None),
    }
}

fn get_decimal(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.parse::<Decimal>().map_err(|e| conv_err(idx, e))
}

fn tier_or_default(value: &str) -> SubscriptionTier {
    SubscriptionTier::parse(value).unwrap_or_else(|| {
        tracing::warn!(value, "unknown subscription tier in storage, defaulting to basic");
        SubscriptionTier::Basic
    })
}

fn status_or_default(value: &str) -> SubscriptionStatus {
    SubscriptionStatus::parse(value).unwrap_or_else(|| {
        tracing::warn!(value, "unknown subscription status in storage, defaulting to inactive");
        SubscriptionStatus::Inactive
    })
}

fn priority_or_default(value: &str) -> Priority {
    Priority::parse(value).unwrap_or_else(|| {
        tracing::warn!(value, "unknown shortlist priority in storage, defaulting to medium");
        Priority::Medium
    })
}

fn map_team(row: &rusqlite::Row<'_>) -> rusqlite::Result<Team> {
    let tier: String = row.get(3)?;
    let status: String = row.get(4)?;
    Ok(Team {
        id: get_uuid(row, 0)?,
        name: row.get(1)?,
        member_association: row.get(2)?,
        tier: tier_or_default(&tier),
        status: status_or_default(&status),
        contact_warnings: row.get(5)?,
        monthly_pitch_quota: row.get(6)?,
        created_at: get_datetime(row, 7)?,
        updated_at: get_datetime(row, 8)?,
    })
}

fn map_agent(row: &rusqlite::Row<'_>) -> rusqlite::Result<Agent> {
    Ok(Agent {
        id: get_uuid(row, 0)?,
        name: row.get(1)?,
        agency: row.get(2)?,
        member_association: row.get(3)?,
        created_at: get_datetime(row, 4)?,
    })
}

fn map_player(row: &rusqlite::Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: get_uuid(row, 0)?,
        team_id: get_uuid(row, 1)?,
        full_name: row.get(2)?,
        position: row.get(3)?,
        citizenship: row.get(4)?,
        date_of_birth: get_opt_date(row, 5)?,
        height_cm: row.get(6)?,
        weight_kg: row.get(7)?,
        bio: row.get(8)?,
        market_value: get_opt_decimal(row, 9)?,
        photo_path: row.get(10)?,
        created_at: get_datetime(row, 11)?,
        updated_at: get_datetime(row, 12)?,
    })
}

fn map_video(row: &rusqlite::Row<'_>) -> rusqlite::Result<Video> {
    Ok(Video {
        id: get_uuid(row, 0)?,
        team_id: get_uuid(row, 1)?,
        title: row.get(2)?,
        object_path: row.get(3)?,
        duration_seconds: row.get(4)?,
        created_at: get_datetime(row, 5)?,
    })
}

fn map_pitch(row: &rusqlite::Row<'_>) -> rusqlite::Result<Pitch> {
    let transfer_type: String = row.get(3)?;
    let currency: String = row.get(5)?;
    let tagged: String = row.get(7)?;
    let status: String = row.get(8)?;
    Ok(Pitch {
        id: get_uuid(row, 0)?,
        team_id: get_uuid(row, 1)?,
        player_id: get_uuid(row, 2)?,
        transfer_type: TransferType::parse(&transfer_type)
            .ok_or_else(|| bad_value(3, format!("unknown transfer type: {transfer_type}")))?,
        asking_price: get_decimal(row, 4)?,
        currency: Currency::parse(&currency)
            .ok_or_else(|| bad_value(5, format!("unknown currency: {currency}")))?,
        international: row.get(6)?,
        tagged_video_ids: serde_json::from_str(&tagged).map_err(|e| conv_err(7, e))?,
        status: PitchStatus::parse(&status)
            .ok_or_else(|| bad_value(8, format!("unknown pitch status: {status}")))?,
        created_at: get_datetime(row, 9)?,
    })
}

fn map_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: get_uuid(row, 0)?,
        pitch_id: get_uuid(row, 1)?,
        team_id: get_uuid(row, 2)?,
        agent_id: get_uuid(row, 3)?,
        created_at: get_datetime(row, 4)?,
    })
}

fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let kind: String = row.get(2)?;
    let sender_id = get_uuid(row, 3)?;
    let sender = match kind.as_str() {
        "team" => Principal::Team(sender_id),
        "agent" => Principal::Agent(sender_id),
        other => return Err(bad_value(2, format!("unknown sender kind: {other}"))),
    };
    Ok(Message {
        id: get_uuid(row, 0)?,
        conversation_id: get_uuid(row, 1)?,
        sender,
        body: row.get(4)?,
        attachment_path: row.get(5)?,
        sent_at: get_datetime(row, 6)?,
    })
}

fn map_shortlist(row: &rusqlite::Row<'_>) -> rusqlite::Result<ShortlistEntry> {
    let priority: String = row.get(3)?;
    Ok(ShortlistEntry {
        id: get_uuid(row, 0)?,
        agent_id: get_uuid(row, 1)?,
        pitch_id: get_uuid(row, 2)?,
        priority: priority_or_default(&priority),
        note: row.get(4)?,
        added_at: get_datetime(row, 5)?,
    })
}
