use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::Principal;

/// A message thread between the pitching team and one interested agent.
/// At most one conversation exists per (pitch, agent) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: Uuid,
    pub pitch_id: Uuid,
    pub team_id: Uuid,
    pub agent_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// One entry in a conversation. Carries a text body, a contract attachment
/// (an object-store path), or both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: Principal,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub attachment_path: Option<String>,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn has_attachment(&self) -> bool {
        self.attachment_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_message() {
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: Uuid::new_v4(),
            sender: Principal::Agent(Uuid::new_v4()),
            body: Some("Is the player available for a January move?".to_string()),
            attachment_path: None,
            sent_at: Utc::now(),
        };

        let json = serde_json::to_string(&message).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(message, deserialized);
        assert!(!deserialized.has_attachment());
    }

    #[test]
    fn attachment_only_message_parses() {
        let json = format!(
            r#"{{
                "id": "{}",
                "conversation_id": "{}",
                "sender": {{"kind": "team", "id": "{}"}},
                "attachment_path": "contracts/abc.png",
                "sent_at": "2024-06-01T10:00:00Z"
            }}"#,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        );

        let message: Message = serde_json::from_str(&json).unwrap();
        assert!(message.body.is_none());
        assert!(message.has_attachment());
    }
}
