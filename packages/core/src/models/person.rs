//! Person model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person who can be assigned to tasks and @mentioned in status updates
///
/// # Fields
///
/// - `id`: Unique identifier (UUID)
/// - `name`: Display name, matched case-insensitively by mention lookup
/// - `email`: Optional contact address
/// - `team_id`: Optional reference to the person's team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Unique identifier (UUID)
    pub id: String,

    /// Display name
    pub name: String,

    /// Contact email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Team membership (None means unaffiliated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

impl Person {
    /// Create a new Person with an auto-generated UUID
    pub fn new(
        name: impl Into<String>,
        email: Option<String>,
        team_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email,
            team_id,
        }
    }

    /// Relative URL of this person's detail view
    pub fn detail_url(&self) -> String {
        format!("/people/{}", self.id)
    }
}
