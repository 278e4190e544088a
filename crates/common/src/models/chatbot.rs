//! Chatbot record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a chatbot.
///
/// Only `Active` chatbots are visible to the public widget endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatbotStatus {
    Active,
    Draft,
    Archived,
}

/// A chatbot record owned by exactly one identity.
///
/// `user_id` is stamped server-side at creation and immutable afterwards; it
/// is the sole authorization key for the record and its documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chatbot {
    pub id: Uuid,

    pub user_id: Uuid,

    pub name: String,

    pub description: Option<String>,

    pub status: ChatbotStatus,

    #[serde(default)]
    pub greeting: Option<String>,

    #[serde(default)]
    pub placeholder: Option<String>,

    #[serde(default)]
    pub primary_color: Option<String>,

    #[serde(default)]
    pub position: Option<String>,

    #[serde(default)]
    pub size: Option<String>,

    #[serde(default)]
    pub show_avatar: Option<bool>,

    #[serde(default)]
    pub enable_typing: Option<bool>,

    /// Artificial reply delay in milliseconds, if configured
    #[serde(default)]
    pub response_delay: Option<i64>,

    /// Optional exact-match hostname restriction for the public widget
    #[serde(default)]
    pub allowed_domain: Option<String>,

    #[serde(default)]
    pub initial_messages: Option<Vec<String>>,

    #[serde(default)]
    pub conversations: i64,

    #[serde(default)]
    pub accuracy: i64,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ChatbotStatus::Active).unwrap(),
            "\"active\""
        );
        let status: ChatbotStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, ChatbotStatus::Archived);
    }

    #[test]
    fn test_deserializes_store_row() {
        let row = serde_json::json!({
            "id": "7a9d86f3-41f8-4dd0-9e39-57a224e0a4a4",
            "user_id": "3f9dc14e-6f1a-4b3a-94a0-1a36f6cf8c55",
            "name": "Support Bot",
            "description": null,
            "status": "draft",
            "conversations": 3,
            "accuracy": 88,
            "created_at": "2026-08-01T10:15:00+00:00",
            "last_updated": "2026-08-02T08:00:00+00:00"
        });
        let bot: Chatbot = serde_json::from_value(row).unwrap();
        assert_eq!(bot.status, ChatbotStatus::Draft);
        assert_eq!(bot.conversations, 3);
        assert!(bot.allowed_domain.is_none());
    }
}
