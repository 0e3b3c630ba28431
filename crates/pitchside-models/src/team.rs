use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Feature level of a team's marketplace subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Basic,
    Premium,
    Enterprise,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        }
    }

    /// Parse a stored tier value. Returns None for unknown strings so the
    /// caller can apply its documented default.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(Self::Basic),
            "premium" => Some(Self::Premium),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    /// Pitch creations allowed per calendar month for a fresh subscription
    /// of this tier. Stored on the team row at registration.
    pub fn default_monthly_quota(&self) -> u32 {
        match self {
            Self::Basic => 5,
            Self::Premium => 20,
            Self::Enterprise => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// A club account that lists players on the marketplace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    /// League/federation affiliation. Domestic pitches are only visible to
    /// agents sharing this association.
    pub member_association: Option<String>,
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    /// Moderation strikes accrued from contact-information violations.
    pub contact_warnings: u32,
    /// Pitch creations allowed per calendar month.
    pub monthly_pitch_quota: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An intermediary account that scouts and shortlists pitches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub id: Uuid,
    pub name: String,
    pub agency: Option<String>,
    pub member_association: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Point-in-time view of everything the pitch eligibility rules need to know
/// about a team. Built by the store in a single pass and cached briefly;
/// `pitches_this_month` is derived by counting rows, not read from a counter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamRequirements {
    pub team_id: Uuid,
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    pub contact_warnings: u32,
    /// Size of the team's video library.
    pub video_count: u32,
    /// Pitches created in the current UTC calendar month.
    pub pitches_this_month: u32,
    pub monthly_pitch_quota: u32,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_serialization() {
        assert_eq!(
            serde_json::to_string(&SubscriptionTier::Basic).unwrap(),
            "\"basic\""
        );
        assert_eq!(
            serde_json::to_string(&SubscriptionTier::Enterprise).unwrap(),
            "\"enterprise\""
        );
    }

    #[test]
    fn tier_parse_rejects_unknown() {
        assert_eq!(SubscriptionTier::parse("premium"), Some(SubscriptionTier::Premium));
        assert_eq!(SubscriptionTier::parse("gold"), None);
        assert_eq!(SubscriptionTier::parse(""), None);
    }

    #[test]
    fn tier_default_quotas_increase() {
        let basic = SubscriptionTier::Basic.default_monthly_quota();
        let premium = SubscriptionTier::Premium.default_monthly_quota();
        let enterprise = SubscriptionTier::Enterprise.default_monthly_quota();
        assert!(basic > 0);
        assert!(premium > basic);
        assert!(enterprise > premium);
    }

    #[test]
    fn status_parse() {
        assert_eq!(
            SubscriptionStatus::parse("active"),
            Some(SubscriptionStatus::Active)
        );
        assert_eq!(SubscriptionStatus::parse("trialing"), None);
    }

    #[test]
    fn roundtrip_team_requirements() {
        let snapshot = TeamRequirements {
            team_id: Uuid::new_v4(),
            tier: SubscriptionTier::Premium,
            status: SubscriptionStatus::Active,
            contact_warnings: 1,
            video_count: 7,
            pitches_this_month: 2,
            monthly_pitch_quota: 20,
            fetched_at: Utc::now(),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let deserialized: TeamRequirements = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, deserialized);
    }

    #[test]
    fn roundtrip_team() {
        let team = Team {
            id: Uuid::new_v4(),
            name: "Lagos City FC".to_string(),
            member_association: Some("NPFL".to_string()),
            tier: SubscriptionTier::Basic,
            status: SubscriptionStatus::Active,
            contact_warnings: 0,
            monthly_pitch_quota: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&team).unwrap();
        let deserialized: Team = serde_json::from_str(&json).unwrap();
        assert_eq!(team, deserialized);
    }
}
