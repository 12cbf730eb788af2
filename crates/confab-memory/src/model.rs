//! Conversation data model shared by backends and the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default bound on the retained turn window.
pub const DEFAULT_MAX_TURNS: usize = 50;

/// Speaker of a single turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human side of the conversation.
    User,
    /// The voice agent side.
    Agent,
}

impl Role {
    /// Parse a wire value, returning `None` for anything unknown.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "user" => Some(Role::User),
            "agent" => Some(Role::Agent),
            _ => None,
        }
    }

    /// Label used when rendering a transcript line.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Agent => "Agent",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

/// One utterance in the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    /// Speaker for this turn.
    pub role: Role,
    /// Utterance content.
    pub text: String,
    /// Creation time, assigned at append.
    pub timestamp: DateTime<Utc>,
}

/// The persisted conversation aggregate.
///
/// One record per deployment, stored under a single logical key and
/// replaced wholesale on every write. Field names stay camelCase on the
/// wire so records written by earlier deployments remain readable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationMemory {
    /// Retained turn window, oldest first. Never longer than the cap.
    pub turns: Vec<Turn>,
    /// Lifetime count of appended turns, including evicted ones.
    pub total_turns: u64,
    /// Time of the most recent eviction, if one ever happened.
    pub trimmed_at: Option<DateTime<Utc>>,
}

impl ConversationMemory {
    /// Number of lifetime turns no longer in the retained window.
    pub fn dropped_turns(&self) -> u64 {
        self.total_turns.saturating_sub(self.turns.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversationMemory, Role, Turn};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn role_parses_wire_values_only() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("agent"), Some(Role::Agent));
        assert_eq!(Role::parse("system"), None);
        assert_eq!(Role::parse("User"), None);
    }

    #[test]
    fn aggregate_round_trips_with_camel_case_keys() {
        let memory = ConversationMemory {
            turns: vec![Turn {
                role: Role::User,
                text: "hello".to_string(),
                timestamp: Utc::now(),
            }],
            total_turns: 3,
            trimmed_at: Some(Utc::now()),
        };
        let raw = serde_json::to_string(&memory).expect("serialize");
        assert!(raw.contains("\"totalTurns\":3"));
        assert!(raw.contains("\"trimmedAt\""));
        assert!(raw.contains("\"role\":\"user\""));
        let decoded: ConversationMemory = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(decoded, memory);
    }

    #[test]
    fn missing_fields_decode_as_empty_aggregate() {
        let decoded: ConversationMemory = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(decoded, ConversationMemory::default());
        assert_eq!(decoded.dropped_turns(), 0);
    }

    #[test]
    fn dropped_turns_counts_evicted_entries() {
        let memory = ConversationMemory {
            turns: Vec::new(),
            total_turns: 7,
            trimmed_at: None,
        };
        assert_eq!(memory.dropped_turns(), 7);
    }
}
