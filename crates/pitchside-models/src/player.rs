use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The eight profile fields a player must have filled in before any pitch
/// can reference them. Order here is the order missing fields are reported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlayerField {
    FullName,
    Position,
    Citizenship,
    DateOfBirth,
    Height,
    Weight,
    Bio,
    MarketValue,
}

impl PlayerField {
    pub const ALL: [PlayerField; 8] = [
        PlayerField::FullName,
        PlayerField::Position,
        PlayerField::Citizenship,
        PlayerField::DateOfBirth,
        PlayerField::Height,
        PlayerField::Weight,
        PlayerField::Bio,
        PlayerField::MarketValue,
    ];

    /// Human-readable field name for violation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "full name",
            Self::Position => "position",
            Self::Citizenship => "citizenship",
            Self::DateOfBirth => "date of birth",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Bio => "bio",
            Self::MarketValue => "market value",
        }
    }
}

/// A player on a team's roster. Profiles are built incrementally, so every
/// eligibility-required field except the name is optional in storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: Uuid,
    /// Owning team. A player belongs to exactly one team.
    pub team_id: Uuid,
    pub full_name: String,
    pub position: Option<String>,
    pub citizenship: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
    pub bio: Option<String>,
    pub market_value: Option<Decimal>,
    /// Object-store path of the profile photo, when one was uploaded.
    pub photo_path: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Doubles as the optimistic-concurrency token for profile edits.
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Age in whole years on the given date. None when the date of birth is
    /// unset or lies in the future.
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|dob| date.years_since(dob))
    }
}
