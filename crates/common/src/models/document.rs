//! Document record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a document entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSource {
    File,
    Url,
}

/// A knowledge-source document attached to a chatbot.
///
/// `user_id` equals the owning chatbot's `user_id` at creation; both fields
/// are immutable. `storage_path` is present exactly when the source is an
/// uploaded file, and names the blob to remove when the record is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,

    pub chatbot_id: Uuid,

    pub user_id: Uuid,

    pub source_type: DocumentSource,

    pub source_name: String,

    #[serde(default)]
    pub storage_path: Option<String>,

    #[serde(default)]
    pub status: String,

    pub created_at: DateTime<Utc>,
}
