use chrono::NaiveDate;
use serde::Serialize;

use pitchside_models::{Pitch, Player, ShortlistEntry, Team};
use pitchside_rules::missing_fields;

/// A pitch hydrated for an agent's browse listing. Joins the team and player
/// rows and pre-formats the asking price so callers render it as-is.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PitchView {
    pub pitch: Pitch,
    pub team_name: String,
    pub player_name: String,
    pub player_position: Option<String>,
    pub player_age: Option<u32>,
    pub video_count: usize,
    pub display_price: String,
}

impl PitchView {
    pub fn assemble(
        pitch: Pitch,
        team: &Team,
        player: &Player,
        video_count: usize,
        today: NaiveDate,
    ) -> Self {
        let display_price = pitch.currency.format_amount(pitch.asking_price);
        Self {
            team_name: team.name.clone(),
            player_name: player.full_name.clone(),
            player_position: player.position.clone(),
            player_age: player.age_on(today),
            video_count,
            display_price,
            pitch,
        }
    }
}

/// A player on a team's own roster, annotated with what is still missing
/// before the profile can back a pitch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RosterEntry {
    pub player: Player,
    pub age: Option<u32>,
    pub missing_fields: Vec<String>,
    pub profile_complete: bool,
}

impl RosterEntry {
    pub fn assemble(player: Player, today: NaiveDate) -> Self {
        let missing: Vec<String> = missing_fields(&player)
            .into_iter()
            .map(|field| field.label().to_string())
            .collect();
        Self {
            age: player.age_on(today),
            profile_complete: missing.is_empty(),
            missing_fields: missing,
            player,
        }
    }
}

/// A shortlist entry joined with its (hydrated) pitch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShortlistView {
    pub entry: ShortlistEntry,
    pub pitch: PitchView,
}
