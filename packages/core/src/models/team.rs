//! Team model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team that people belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Unique identifier (UUID)
    pub id: String,

    /// Team name
    pub name: String,
}

impl Team {
    /// Create a new Team with an auto-generated UUID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}
