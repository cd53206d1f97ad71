//! Tag model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-form label attached to tasks (unique by name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Unique identifier (UUID)
    pub id: String,

    /// Tag name (unique across the store)
    pub name: String,
}

impl Tag {
    /// Create a new Tag with an auto-generated UUID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}
