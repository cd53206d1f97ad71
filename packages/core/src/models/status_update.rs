//! Status Update model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A timestamped progress note on a task
///
/// The `content` field holds the raw user-authored text. People referenced
/// with @mention tokens are resolved at creation time and persisted in the
/// `status_update_mentions` table; the safe HTML rendering of the body is
/// produced on demand by the text annotator, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Unique identifier (UUID)
    pub id: String,

    /// Owning task
    pub task_id: String,

    /// Raw user-authored text
    pub content: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl StatusUpdate {
    /// Create a new StatusUpdate with an auto-generated UUID
    pub fn new(task_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}
