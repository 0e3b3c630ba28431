use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How urgently an agent wants to follow up on a saved pitch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// An agent's saved pitch. One entry per (agent, pitch) pair; saving again
/// updates the priority and note in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortlistEntry {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub pitch_id: Uuid,
    pub priority: Priority,
    #[serde(default)]
    pub note: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn priority_parse() {
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
    }

    #[test]
    fn roundtrip_entry() {
        let entry = ShortlistEntry {
            id: Uuid::new_v4(),
            agent_id: Uuid::new_v4(),
            pitch_id: Uuid::new_v4(),
            priority: Priority::High,
            note: Some("client asked about left-footed wingers".to_string()),
            added_at: Utc::now(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: ShortlistEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, deserialized);
    }
}
