//! Schema and path conventions shared by the store and anything that
//! inspects the database out of band.
//!
//! Column conventions: ids and timestamps are TEXT (UUID / RFC 3339),
//! decimal amounts are TEXT in canonical form, `tagged_video_ids` is a JSON
//! array of UUIDs, booleans are INTEGER 0/1.

/// DDL for the market database. Idempotent; executed on every open.
pub const MARKET_SCHEMA_DDL: &str = "\
CREATE TABLE IF NOT EXISTS teams (
    id                  TEXT PRIMARY KEY,
    name                TEXT NOT NULL,
    member_association  TEXT,
    tier                TEXT NOT NULL,
    status              TEXT NOT NULL,
    contact_warnings    INTEGER NOT NULL DEFAULT 0,
    monthly_pitch_quota INTEGER NOT NULL,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS agents (
    id                  TEXT PRIMARY KEY,
    name                TEXT NOT NULL,
    agency              TEXT,
    member_association  TEXT,
    created_at          TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS players (
    id             TEXT PRIMARY KEY,
    team_id        TEXT NOT NULL REFERENCES teams(id),
    full_name      TEXT NOT NULL,
    position       TEXT,
    citizenship    TEXT,
    date_of_birth  TEXT,
    height_cm      INTEGER,
    weight_kg      INTEGER,
    bio            TEXT,
    market_value   TEXT,
    photo_path     TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_players_team ON players(team_id);
CREATE TABLE IF NOT EXISTS videos (
    id               TEXT PRIMARY KEY,
    team_id          TEXT NOT NULL REFERENCES teams(id),
    title            TEXT NOT NULL,
    object_path      TEXT NOT NULL,
    duration_seconds INTEGER,
    created_at       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_videos_team ON videos(team_id);
CREATE TABLE IF NOT EXISTS pitches (
    id               TEXT PRIMARY KEY,
    team_id          TEXT NOT NULL REFERENCES teams(id),
    player_id        TEXT NOT NULL REFERENCES players(id),
    transfer_type    TEXT NOT NULL,
    asking_price     TEXT NOT NULL,
    currency         TEXT NOT NULL,
    international    INTEGER NOT NULL DEFAULT 0,
    tagged_video_ids TEXT NOT NULL,
    status           TEXT NOT NULL,
    created_at       TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_pitches_team ON pitches(team_id);
CREATE INDEX IF NOT EXISTS idx_pitches_status ON pitches(status);
CREATE TABLE IF NOT EXISTS conversations (
    id         TEXT PRIMARY KEY,
    pitch_id   TEXT NOT NULL REFERENCES pitches(id),
    team_id    TEXT NOT NULL REFERENCES teams(id),
    agent_id   TEXT NOT NULL REFERENCES agents(id),
    created_at TEXT NOT NULL,
    UNIQUE (pitch_id, agent_id)
);
CREATE TABLE IF NOT EXISTS messages (
    id              TEXT PRIMARY KEY,
    conversation_id TEXT NOT NULL REFERENCES conversations(id),
    sender_kind     TEXT NOT NULL,
    sender_id       TEXT NOT NULL,
    body            TEXT,
    attachment_path TEXT,
    sent_at         TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id);
CREATE TABLE IF NOT EXISTS shortlist (
    id       TEXT PRIMARY KEY,
    agent_id TEXT NOT NULL REFERENCES agents(id),
    pitch_id TEXT NOT NULL REFERENCES pitches(id),
    priority TEXT NOT NULL,
    note     TEXT,
    added_at TEXT NOT NULL,
    UNIQUE (agent_id, pitch_id)
);
CREATE INDEX IF NOT EXISTS idx_shortlist_agent ON shortlist(agent_id);
";

/// Path conventions for the object store.
///
/// Everything under one root, grouped by owner so a team's media can be
/// listed (or wiped) with a prefix:
///
/// - Videos: `videos/{team_id}/{video_id}.{ext}`
/// - Player photos: `photos/{team_id}/{player_id}.{ext}`
/// - Contract documents: `contracts/{conversation_id}/{artifact_id}.png`
pub mod object_paths {
    use uuid::Uuid;

    pub fn video(team_id: Uuid, video_id: Uuid, ext: &str) -> String {
        format!("videos/{team_id}/{video_id}.{ext}")
    }

    pub fn player_photo(team_id: Uuid, player_id: Uuid, ext: &str) -> String {
        format!("photos/{team_id}/{player_id}.{ext}")
    }

    pub fn contract(conversation_id: Uuid, artifact_id: Uuid) -> String {
        format!("contracts/{conversation_id}/{artifact_id}.png")
    }
}
