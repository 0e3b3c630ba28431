use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use pitchside_contracts::{render_contract, ContractFont};
use pitchside_models::team::{SubscriptionStatus, SubscriptionTier};
use pitchside_models::{
    object_paths, Agent, ContractTerms, Conversation, EligibilityReport, Message, Pitch,
    PitchDraft, PitchStatus, PitchsideConfig, Player, Principal, Priority, Session,
    ShortlistEntry, Team, Video,
};
use pitchside_rules::{evaluate_pitch, screen_contact_info};
use pitchside_store::{MarketDb, ObjectStore, SnapshotReader, StoreError};

use crate::error::MarketError;
use crate::listing::{Page, PitchFilter, PitchSort};
use crate::views::{PitchView, RosterEntry, ShortlistView};

/// The marketplace service. One instance owns the database, the snapshot
/// cache and the object store; every session-scoped operation checks
/// ownership before touching anything.
pub struct Marketplace {
    db: Arc<MarketDb>,
    snapshots: SnapshotReader,
    objects: ObjectStore,
    config: PitchsideConfig,
}

fn found<T>(record: Option<T>, kind: &'static str, id: Uuid) -> Result<T, MarketError> {
    record.ok_or_else(|| MarketError::Store(StoreError::not_found(kind, id)))
}

fn require_team(session: &Session, team_id: Uuid) -> Result<(), MarketError> {
    match session.principal {
        Principal::Team(id) if id == team_id => Ok(()),
        _ => Err(MarketError::Forbidden(format!(
            "session may not act for team {team_id}"
        ))),
    }
}

fn require_agent(session: &Session) -> Result<Uuid, MarketError> {
    match session.principal {
        Principal::Agent(id) => Ok(id),
        Principal::Team(_) => Err(MarketError::Forbidden(
            "only agents may perform this operation".to_string(),
        )),
    }
}

/// Both parties of a conversation may read and write it; nobody else.
fn member_of(conversation: &Conversation, session: &Session) -> Result<Principal, MarketError> {
    match session.principal {
        Principal::Team(id) if id == conversation.team_id => Ok(session.principal),
        Principal::Agent(id) if id == conversation.agent_id => Ok(session.principal),
        _ => Err(MarketError::Forbidden(format!(
            "session is not a party to conversation {}",
            conversation.id
        ))),
    }
}

/// International pitches are visible to every agent; domestic pitches only
/// to agents registered under the pitching team's member association.
fn visible_to(pitch: &Pitch, team: &Team, agent: &Agent) -> bool {
    if pitch.international {
        return true;
    }
    match (&team.member_association, &agent.member_association) {
        (Some(team_assoc), Some(agent_assoc)) => team_assoc == agent_assoc,
        _ => false,
    }
}

fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::Low => 0,
        Priority::Medium => 1,
        Priority::High => 2,
    }
}

fn sort_views(views: &mut [PitchView], sort: PitchSort) {
    match sort {
        PitchSort::Newest => views.sort_by(|a, b| b.pitch.created_at.cmp(&a.pitch.created_at)),
        PitchSort::Oldest => views.sort_by(|a, b| a.pitch.created_at.cmp(&b.pitch.created_at)),
        PitchSort::PriceAscending => {
            views.sort_by(|a, b| a.pitch.asking_price.cmp(&b.pitch.asking_price))
        }
        PitchSort::PriceDescending => {
            views.sort_by(|a, b| b.pitch.asking_price.cmp(&a.pitch.asking_price))
        }
    }
}

impl Marketplace {
    pub fn new(db: MarketDb, objects: ObjectStore, config: PitchsideConfig) -> Self {
        let db = Arc::new(db);
        let snapshots = SnapshotReader::new(
            db.clone(),
            config.store.snapshot_capacity,
            Duration::from_secs(config.store.snapshot_ttl_seconds),
        );
        Self {
            db,
            snapshots,
            objects,
            config,
        }
    }

    // ---- profiles ----

    /// Register a team. The monthly pitch quota starts at the tier default.
    pub fn register_team(
        &self,
        name: &str,
        member_association: Option<&str>,
        tier: SubscriptionTier,
    ) -> Result<Team, MarketError> {
        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            member_association: member_association.map(str::to_string),
            tier,
            status: SubscriptionStatus::Active,
            contact_warnings: 0,
            monthly_pitch_quota: tier.default_monthly_quota(),
            created_at: now,
            updated_at: now,
        };
        self.db.insert_team(&team)?;
        info!(team_id = %team.id, name = %team.name, tier = tier.as_str(), "Registered team");
        Ok(team)
    }

    pub fn register_agent(
        &self,
        name: &str,
        agency: Option<&str>,
        member_association: Option<&str>,
    ) -> Result<Agent, MarketError> {
        let agent = Agent {
            id: Uuid::new_v4(),
            name: name.to_string(),
            agency: agency.map(str::to_string),
            member_association: member_association.map(str::to_string),
            created_at: Utc::now(),
        };
        self.db.insert_agent(&agent)?;
        info!(agent_id = %agent.id, name = %agent.name, "Registered agent");
        Ok(agent)
    }

    /// Change a team's tier and status. The quota follows the new tier's
    /// default unless `quota_override` pins it.
    pub async fn set_subscription(
        &self,
        session: &Session,
        team_id: Uuid,
        tier: SubscriptionTier,
        status: SubscriptionStatus,
        quota_override: Option<u32>,
    ) -> Result<Team, MarketError> {
        require_team(session, team_id)?;
        let quota = quota_override.unwrap_or_else(|| tier.default_monthly_quota());
        self.db.update_subscription(team_id, tier, status, quota)?;
        self.snapshots.invalidate(team_id).await;
        found(self.db.get_team(team_id)?, "team", team_id)
    }

    // ---- roster ----

    /// Create a player with just a name; the rest of the profile is filled
    /// in through `update_player`.
    pub fn add_player(
        &self,
        session: &Session,
        team_id: Uuid,
        full_name: &str,
    ) -> Result<Player, MarketError> {
        require_team(session, team_id)?;
        let now = Utc::now();
        let player = Player {
            id: Uuid::new_v4(),
            team_id,
            full_name: full_name.to_string(),
            position: None,
            citizenship: None,
            date_of_birth: None,
            height_cm: None,
            weight_kg: None,
            bio: None,
            market_value: None,
            photo_path: None,
            created_at: now,
            updated_at: now,
        };
        self.db.insert_player(&player)?;
        Ok(player)
    }

    /// Apply an edited profile. `expected_updated_at` is the token read
    /// alongside the profile; when someone else saved first the edit fails
    /// with a conflict instead of silently clobbering theirs.
    pub fn update_player(
        &self,
        session: &Session,
        player: &Player,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<Player, MarketError> {
        let stored = found(self.db.get_player(player.id)?, "player", player.id)?;
        require_team(session, stored.team_id)?;
        if player.team_id != stored.team_id {
            return Err(MarketError::Forbidden(
                "a profile edit cannot move a player to another team".to_string(),
            ));
        }
        let mut updated = player.clone();
        updated.updated_at = Utc::now();
        self.db.update_player(&updated, expected_updated_at)?;
        Ok(updated)
    }

    pub fn remove_player(&self, session: &Session, player_id: Uuid) -> Result<(), MarketError> {
        let player = found(self.db.get_player(player_id)?, "player", player_id)?;
        require_team(session, player.team_id)?;
        self.db.delete_player(player_id)?;
        Ok(())
    }

    /// The team's players with per-profile completeness.
    pub fn roster(&self, session: &Session, team_id: Uuid) -> Result<Vec<RosterEntry>, MarketError> {
        require_team(session, team_id)?;
        let today = Utc::now().date_naive();
        let players = self.db.list_players(team_id)?;
        Ok(players
            .into_iter()
            .map(|player| RosterEntry::assemble(player, today))
            .collect())
    }

    // ---- video library ----

    /// Store the bytes, then the row. A failed row insert removes the
    /// object again so the library never references unrecorded bytes.
    pub async fn add_video(
        &self,
        session: &Session,
        team_id: Uuid,
        title: &str,
        extension: &str,
        bytes: &[u8],
        duration_seconds: Option<u32>,
    ) -> Result<Video, MarketError> {
        require_team(session, team_id)?;
        let video_id = Uuid::new_v4();
        let object_path = object_paths::video(team_id, video_id, extension);
        self.objects.put(&object_path, bytes)?;
        let video = Video {
            id: video_id,
            team_id,
            title: title.to_string(),
            object_path: object_path.clone(),
            duration_seconds,
            created_at: Utc::now(),
        };
        if let Err(error) = self.db.insert_video(&video) {
            if let Err(cleanup) = self.objects.delete(&object_path) {
                warn!(path = %object_path, error = %cleanup, "Failed to remove orphaned video object");
            }
            return Err(error.into());
        }
        self.snapshots.invalidate(team_id).await;
        Ok(video)
    }

    /// Delete the row, then the object. The row is the source of truth; an
    /// already-missing object is logged and tolerated.
    pub async fn remove_video(&self, session: &Session, video_id: Uuid) -> Result<(), MarketError> {
        let video = found(self.db.get_video(video_id)?, "video", video_id)?;
        require_team(session, video.team_id)?;
        self.db.delete_video(video_id)?;
        if let Err(error) = self.objects.delete(&video.object_path) {
            warn!(path = %video.object_path, error = %error, "Video object was already gone");
        }
        self.snapshots.invalidate(video.team_id).await;
        Ok(())
    }

    pub fn videos(&self, session: &Session, team_id: Uuid) -> Result<Vec<Video>, MarketError> {
        require_team(session, team_id)?;
        Ok(self.db.list_videos(team_id)?)
    }

    // ---- pitching ----

    /// Dry-run the eligibility rules against a fresh snapshot. Read-only;
    /// reports every violated rule, not just the first.
    pub async fn check_pitch(
        &self,
        session: &Session,
        team_id: Uuid,
        draft: &PitchDraft,
    ) -> Result<EligibilityReport, MarketError> {
        require_team(session, team_id)?;
        let requirements = found(self.snapshots.fetch_fresh(team_id).await?, "team", team_id)?;
        let player = self.draft_player(team_id, draft)?;
        Ok(evaluate_pitch(&requirements, player.as_ref(), draft))
    }

    /// Create a pitch. The snapshot is re-fetched and the draft re-validated
    /// server-side; submission never trusts a cached snapshot or an earlier
    /// `check_pitch`. An ineligible draft fails with the full reason list.
    pub async fn create_pitch(
        &self,
        session: &Session,
        team_id: Uuid,
        draft: &PitchDraft,
    ) -> Result<Pitch, MarketError> {
        require_team(session, team_id)?;
        let requirements = found(self.snapshots.fetch_fresh(team_id).await?, "team", team_id)?;
        let player = self.draft_player(team_id, draft)?;
        let report = evaluate_pitch(&requirements, player.as_ref(), draft);
        let player_id = match (report.eligible, draft.player_id) {
            (true, Some(id)) => id,
            _ => return Err(MarketError::Ineligible(report)),
        };

        // Tagged videos must exist and belong to the pitching team.
        for video_id in &draft.tagged_video_ids {
            let video = found(self.db.get_video(*video_id)?, "video", *video_id)?;
            if video.team_id != team_id {
                return Err(MarketError::Forbidden(format!(
                    "video {video_id} belongs to another team"
                )));
            }
        }

        let pitch = Pitch {
            id: Uuid::new_v4(),
            team_id,
            player_id,
            transfer_type: draft.transfer_type,
            asking_price: draft.asking_price,
            currency: draft.currency,
            international: draft.international,
            tagged_video_ids: draft.tagged_video_ids.clone(),
            status: PitchStatus::Active,
            created_at: Utc::now(),
        };
        self.db.insert_pitch(&pitch)?;
        self.snapshots.invalidate(team_id).await;
        info!(pitch_id = %pitch.id, team_id = %team_id, player_id = %player_id, "Created pitch");
        Ok(pitch)
    }

    /// A draft's player counts only when it exists and belongs to the
    /// pitching team; anything else evaluates as no player selected.
    fn draft_player(&self, team_id: Uuid, draft: &PitchDraft) -> Result<Option<Player>, MarketError> {
        match draft.player_id {
            Some(id) => Ok(self.db.get_player(id)?.filter(|p| p.team_id == team_id)),
            None => Ok(None),
        }
    }

    pub fn withdraw_pitch(&self, session: &Session, pitch_id: Uuid) -> Result<Pitch, MarketError> {
        self.transition_pitch(session, pitch_id, PitchStatus::Withdrawn)
    }

    pub fn complete_pitch(&self, session: &Session, pitch_id: Uuid) -> Result<Pitch, MarketError> {
        self.transition_pitch(session, pitch_id, PitchStatus::Completed)
    }

    /// Only active pitches transition. Withdrawn pitches keep counting
    /// against the month's quota, so the snapshot stays valid as-is.
    fn transition_pitch(
        &self,
        session: &Session,
        pitch_id: Uuid,
        status: PitchStatus,
    ) -> Result<Pitch, MarketError> {
        let mut pitch = found(self.db.get_pitch(pitch_id)?, "pitch", pitch_id)?;
        require_team(session, pitch.team_id)?;
        if pitch.status != PitchStatus::Active {
            return Err(MarketError::Store(StoreError::Conflict(format!(
                "pitch {pitch_id} is already {}",
                pitch.status.as_str()
            ))));
        }
        self.db.set_pitch_status(pitch_id, status)?;
        pitch.status = status;
        Ok(pitch)
    }

    /// The team's own pitches, any status, newest first.
    pub fn team_pitches(&self, session: &Session, team_id: Uuid) -> Result<Vec<Pitch>, MarketError> {
        require_team(session, team_id)?;
        Ok(self.db.list_team_pitches(team_id)?)
    }

    // ---- listing ----

    /// Browse active pitches visible to the calling agent, filtered, sorted
    /// and paginated in memory. Hydration is lenient: rows referencing a
    /// vanished team or player are logged and skipped, never a hard failure.
    pub fn browse_pitches(
        &self,
        session: &Session,
        filter: &PitchFilter,
        sort: PitchSort,
        page: usize,
        per_page: usize,
    ) -> Result<Page<PitchView>, MarketError> {
        let agent_id = require_agent(session)?;
        let agent = found(self.db.get_agent(agent_id)?, "agent", agent_id)?;

        let today = Utc::now().date_naive();
        let mut teams: HashMap<Uuid, Option<Team>> = HashMap::new();
        let mut views = Vec::new();
        for pitch in self.db.list_active_pitches()? {
            if !filter.matches(&pitch) {
                continue;
            }
            let Some(team) = self.team_cached(&mut teams, pitch.team_id)? else {
                continue;
            };
            if !visible_to(&pitch, team, &agent) {
                continue;
            }
            if let Some(view) = self.hydrate_pitch(pitch, team, today)? {
                views.push(view);
            }
        }

        sort_views(&mut views, sort);
        Ok(Page::paginate(views, page, per_page))
    }

    fn team_cached<'a>(
        &self,
        teams: &'a mut HashMap<Uuid, Option<Team>>,
        team_id: Uuid,
    ) -> Result<Option<&'a Team>, MarketError> {
        if !teams.contains_key(&team_id) {
            let team = self.db.get_team(team_id)?;
            if team.is_none() {
                warn!(team_id = %team_id, "Skipping pitch whose team row is gone");
            }
            teams.insert(team_id, team);
        }
        Ok(teams.get(&team_id).and_then(Option::as_ref))
    }

    fn hydrate_pitch(
        &self,
        pitch: Pitch,
        team: &Team,
        today: NaiveDate,
    ) -> Result<Option<PitchView>, MarketError> {
        let player = match self.db.get_player(pitch.player_id)? {
            Some(player) => player,
            None => {
                warn!(pitch_id = %pitch.id, player_id = %pitch.player_id, "Skipping pitch whose player row is gone");
                return Ok(None);
            }
        };
        let surviving = self.db.get_videos(&pitch.tagged_video_ids)?.len();
        if surviving < pitch.tagged_video_ids.len() {
            warn!(
                pitch_id = %pitch.id,
                tagged = pitch.tagged_video_ids.len(),
                surviving,
                "Pitch references removed videos"
            );
        }
        Ok(Some(PitchView::assemble(pitch, team, &player, surviving, today)))
    }

    // ---- messaging ----

    /// Start (or return) the conversation between the calling agent and the
    /// pitching team. One conversation per pitch and agent.
    pub fn open_conversation(
        &self,
        session: &Session,
        pitch_id: Uuid,
    ) -> Result<Conversation, MarketError> {
        let agent_id = require_agent(session)?;
        let agent = found(self.db.get_agent(agent_id)?, "agent", agent_id)?;
        let pitch = found(self.db.get_pitch(pitch_id)?, "pitch", pitch_id)?;
        if pitch.status != PitchStatus::Active {
            return Err(MarketError::Store(StoreError::Conflict(format!(
                "pitch {pitch_id} is no longer active"
            ))));
        }
        let team = found(self.db.get_team(pitch.team_id)?, "team", pitch.team_id)?;
        if !visible_to(&pitch, &team, &agent) {
            return Err(MarketError::Forbidden(format!(
                "pitch {pitch_id} is not visible to this agent"
            )));
        }
        if let Some(existing) = self.db.find_conversation(pitch_id, agent_id)? {
            return Ok(existing);
        }
        let conversation = Conversation {
            id: Uuid::new_v4(),
            pitch_id,
            team_id: pitch.team_id,
            agent_id,
            created_at: Utc::now(),
        };
        self.db.insert_conversation(&conversation)?;
        info!(
            conversation_id = %conversation.id,
            pitch_id = %pitch_id,
            agent_id = %agent_id,
            "Opened conversation"
        );
        Ok(conversation)
    }

    /// Send a text message. The body is screened for direct contact details
    /// first; a match blocks the message, and when the sender is a team the
    /// strike also raises the team's warning count.
    pub async fn send_message(
        &self,
        session: &Session,
        conversation_id: Uuid,
        body: &str,
    ) -> Result<Message, MarketError> {
        let conversation = found(
            self.db.get_conversation(conversation_id)?,
            "conversation",
            conversation_id,
        )?;
        let sender = member_of(&conversation, session)?;

        if let Some(violation) = screen_contact_info(body) {
            if sender.is_team() {
                let warnings = self.db.bump_contact_warnings(conversation.team_id)?;
                self.snapshots.invalidate(conversation.team_id).await;
                warn!(
                    conversation_id = %conversation_id,
                    team_id = %conversation.team_id,
                    warnings,
                    violation = %violation,
                    "Blocked team message carrying contact details"
                );
            } else {
                warn!(
                    conversation_id = %conversation_id,
                    sender = %sender,
                    violation = %violation,
                    "Blocked agent message carrying contact details"
                );
            }
            return Err(MarketError::MessageBlocked(violation));
        }

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender,
            body: Some(body.to_string()),
            attachment_path: None,
            sent_at: Utc::now(),
        };
        self.db.insert_message(&message)?;
        Ok(message)
    }

    /// Messages of a conversation in send order.
    pub fn conversation_timeline(
        &self,
        session: &Session,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, MarketError> {
        let conversation = found(
            self.db.get_conversation(conversation_id)?,
            "conversation",
            conversation_id,
        )?;
        member_of(&conversation, session)?;
        Ok(self.db.list_messages(conversation_id)?)
    }

    // ---- contracts ----

    /// Draft, rasterize and attach a contract to a conversation, all under
    /// the cancellation token and the configured time budget. The message
    /// row is appended only after the object write succeeds, so an
    /// interrupted attach never leaves a message pointing at missing bytes.
    ///
    /// `font_path` overrides the configured font; with neither set the
    /// environment and system locations are searched.
    pub async fn attach_contract(
        &self,
        session: &Session,
        conversation_id: Uuid,
        terms: &ContractTerms,
        font_path: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<Message, MarketError> {
        let conversation = found(
            self.db.get_conversation(conversation_id)?,
            "conversation",
            conversation_id,
        )?;
        let sender = member_of(&conversation, session)?;

        let budget = Duration::from_secs(self.config.service.attach_timeout_seconds);
        let work = self.attach_contract_inner(&conversation, sender, terms, font_path);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(MarketError::Cancelled),
            result = tokio::time::timeout(budget, work) => match result {
                Ok(outcome) => outcome,
                Err(_) => Err(MarketError::Timeout),
            },
        }
    }

    async fn attach_contract_inner(
        &self,
        conversation: &Conversation,
        sender: Principal,
        terms: &ContractTerms,
        font_path: Option<&str>,
    ) -> Result<Message, MarketError> {
        // Rendering and storing are synchronous; the yields ahead of each
        // stage are where cancellation and the budget take effect.
        tokio::task::yield_now().await;
        let configured = font_path.or(self.config.contracts.font_path.as_deref());
        let font = ContractFont::discover(configured)?;
        let artifact = render_contract(
            terms,
            &font,
            self.config.contracts.page_width,
            self.config.contracts.page_height,
        )?;

        tokio::task::yield_now().await;
        let path = object_paths::contract(conversation.id, Uuid::new_v4());
        self.objects.put(&path, &artifact.bytes)?;

        // No await between the put and the insert.
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: conversation.id,
            sender,
            body: None,
            attachment_path: Some(path.clone()),
            sent_at: Utc::now(),
        };
        if let Err(error) = self.db.insert_message(&message) {
            if let Err(cleanup) = self.objects.delete(&path) {
                warn!(path = %path, error = %cleanup, "Failed to remove orphaned contract object");
            }
            return Err(error.into());
        }
        info!(
            conversation_id = %conversation.id,
            path = %path,
            bytes = artifact.bytes.len(),
            "Attached contract"
        );
        Ok(message)
    }

    /// Load a contract attachment for display. The path must lie under the
    /// conversation's own attachment prefix.
    pub fn fetch_attachment(
        &self,
        session: &Session,
        conversation_id: Uuid,
        path: &str,
    ) -> Result<Vec<u8>, MarketError> {
        let conversation = found(
            self.db.get_conversation(conversation_id)?,
            "conversation",
            conversation_id,
        )?;
        member_of(&conversation, session)?;
        let prefix = format!("contracts/{conversation_id}/");
        if !path.starts_with(&prefix) {
            return Err(MarketError::Forbidden(format!(
                "attachment {path} does not belong to conversation {conversation_id}"
            )));
        }
        Ok(self.objects.get(path)?)
    }

    // ---- shortlist ----

    /// Save a pitch with a priority and optional note. Saving again updates
    /// both in place; the original entry id and save time survive.
    pub fn shortlist_pitch(
        &self,
        session: &Session,
        pitch_id: Uuid,
        priority: Priority,
        note: Option<&str>,
    ) -> Result<ShortlistEntry, MarketError> {
        let agent_id = require_agent(session)?;
        let agent = found(self.db.get_agent(agent_id)?, "agent", agent_id)?;
        let pitch = found(self.db.get_pitch(pitch_id)?, "pitch", pitch_id)?;
        let team = found(self.db.get_team(pitch.team_id)?, "team", pitch.team_id)?;
        if !visible_to(&pitch, &team, &agent) {
            return Err(MarketError::Forbidden(format!(
                "pitch {pitch_id} is not visible to this agent"
            )));
        }
        let entry = ShortlistEntry {
            id: Uuid::new_v4(),
            agent_id,
            pitch_id,
            priority,
            note: note.map(str::to_string),
            added_at: Utc::now(),
        };
        self.db.upsert_shortlist(&entry)?;
        // On a re-save the original row survives; read back what is stored.
        let entries = self.db.list_shortlist(agent_id)?;
        entries
            .into_iter()
            .find(|e| e.pitch_id == pitch_id)
            .ok_or_else(|| MarketError::Store(StoreError::not_found("shortlist entry", pitch_id)))
    }

    pub fn unshortlist_pitch(&self, session: &Session, pitch_id: Uuid) -> Result<(), MarketError> {
        let agent_id = require_agent(session)?;
        Ok(self.db.remove_shortlist(agent_id, pitch_id)?)
    }

    /// The agent's saved pitches, hydrated, highest priority first and most
    /// recently saved first within a priority. Entries whose pitch has
    /// vanished are logged and skipped; withdrawn and completed pitches
    /// stay listed with their status.
    pub fn shortlisted(&self, session: &Session) -> Result<Vec<ShortlistView>, MarketError> {
        let agent_id = require_agent(session)?;
        let today = Utc::now().date_naive();
        let mut teams: HashMap<Uuid, Option<Team>> = HashMap::new();
        let mut views = Vec::new();
        for entry in self.db.list_shortlist(agent_id)? {
            let Some(pitch) = self.db.get_pitch(entry.pitch_id)? else {
                warn!(agent_id = %agent_id, pitch_id = %entry.pitch_id, "Skipping shortlist entry whose pitch is gone");
                continue;
            };
            let Some(team) = self.team_cached(&mut teams, pitch.team_id)? else {
                continue;
            };
            if let Some(view) = self.hydrate_pitch(pitch, team, today)? {
                views.push(ShortlistView { entry, pitch: view });
            }
        }
        views.sort_by(|a, b| {
            priority_rank(b.entry.priority)
                .cmp(&priority_rank(a.entry.priority))
                .then(b.entry.added_at.cmp(&a.entry.added_at))
        });
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn marketplace() -> (Marketplace, tempfile::TempDir) {
        let db = MarketDb::open_in_memory().expect("in-memory db");
        let dir = tempfile::tempdir().expect("tempdir");
        let objects = ObjectStore::open(dir.path().to_str().expect("utf8 path")).expect("objects");
        let market = Marketplace::new(db, objects, PitchsideConfig::default());
        (market, dir)
    }

    fn pitch_stub(international: bool) -> Pitch {
        Pitch {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            transfer_type: pitchside_models::TransferType::Permanent,
            asking_price: dec!(1_000_000),
            currency: pitchside_models::Currency::Ngn,
            international,
            tagged_video_ids: vec![Uuid::new_v4()],
            status: PitchStatus::Active,
            created_at: Utc::now(),
        }
    }

    fn team_stub(association: Option<&str>) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: "Rivers United".to_string(),
            member_association: association.map(str::to_string),
            tier: SubscriptionTier::Basic,
            status: SubscriptionStatus::Active,
            contact_warnings: 0,
            monthly_pitch_quota: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn agent_stub(association: Option<&str>) -> Agent {
        Agent {
            id: Uuid::new_v4(),
            name: "R. Okafor".to_string(),
            agency: None,
            member_association: association.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn registration_applies_tier_quota() {
        let (market, _dir) = marketplace();
        let team = market
            .register_team("Rivers United", Some("NFF"), SubscriptionTier::Premium)
            .unwrap();
        assert_eq!(team.monthly_pitch_quota, 20);
        assert_eq!(team.status, SubscriptionStatus::Active);
        assert_eq!(team.contact_warnings, 0);
    }

    #[tokio::test]
    async fn subscription_change_rederives_quota() {
        let (market, _dir) = marketplace();
        let team = market
            .register_team("Rivers United", None, SubscriptionTier::Basic)
            .unwrap();
        let session = Session::team(team.id);

        let updated = market
            .set_subscription(
                &session,
                team.id,
                SubscriptionTier::Enterprise,
                SubscriptionStatus::Active,
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated.monthly_pitch_quota, 100);

        let pinned = market
            .set_subscription(
                &session,
                team.id,
                SubscriptionTier::Basic,
                SubscriptionStatus::Active,
                Some(7),
            )
            .await
            .unwrap();
        assert_eq!(pinned.monthly_pitch_quota, 7);
    }

    #[tokio::test]
    async fn operations_reject_foreign_sessions() {
        let (market, _dir) = marketplace();
        let team = market
            .register_team("Rivers United", None, SubscriptionTier::Basic)
            .unwrap();
        let other = market
            .register_team("Harbour City FC", None, SubscriptionTier::Basic)
            .unwrap();

        let result = market
            .set_subscription(
                &Session::team(other.id),
                team.id,
                SubscriptionTier::Basic,
                SubscriptionStatus::Inactive,
                None,
            )
            .await;
        assert!(matches!(result, Err(MarketError::Forbidden(_))));
        assert!(matches!(
            market.roster(&Session::team(other.id), team.id),
            Err(MarketError::Forbidden(_))
        ));
    }

    #[test]
    fn browse_requires_an_agent() {
        let (market, _dir) = marketplace();
        let team = market
            .register_team("Rivers United", None, SubscriptionTier::Basic)
            .unwrap();
        let result = market.browse_pitches(
            &Session::team(team.id),
            &PitchFilter::default(),
            PitchSort::default(),
            1,
            10,
        );
        assert!(matches!(result, Err(MarketError::Forbidden(_))));
    }

    #[test]
    fn domestic_visibility_requires_matching_associations() {
        let pitch = pitch_stub(false);
        assert!(visible_to(
            &pitch,
            &team_stub(Some("NFF")),
            &agent_stub(Some("NFF"))
        ));
        assert!(!visible_to(
            &pitch,
            &team_stub(Some("NFF")),
            &agent_stub(Some("NPFL"))
        ));
        assert!(!visible_to(&pitch, &team_stub(Some("NFF")), &agent_stub(None)));
        assert!(!visible_to(&pitch, &team_stub(None), &agent_stub(Some("NFF"))));
    }

    #[test]
    fn international_pitches_are_visible_to_everyone() {
        let pitch = pitch_stub(true);
        assert!(visible_to(&pitch, &team_stub(None), &agent_stub(None)));
        assert!(visible_to(
            &pitch,
            &team_stub(Some("NFF")),
            &agent_stub(Some("NPFL"))
        ));
    }

    #[test]
    fn update_player_cannot_move_teams() {
        let (market, _dir) = marketplace();
        let team = market
            .register_team("Rivers United", None, SubscriptionTier::Basic)
            .unwrap();
        let session = Session::team(team.id);
        let player = market.add_player(&session, team.id, "Chidi Okeke").unwrap();

        let mut edited = player.clone();
        edited.team_id = Uuid::new_v4();
        let result = market.update_player(&session, &edited, player.updated_at);
        assert!(matches!(result, Err(MarketError::Forbidden(_))));
    }
}
