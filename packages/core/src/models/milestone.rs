//! Milestone model
//!
//! Milestones mark a dated checkpoint on a task. Their status is not
//! stored; it is derived from the milestone date and the state of the
//! owning task and project, unless a manual override is set.

use crate::models::{ProjectStatus, TaskStatus, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reported health of a milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    OnTrack,
    Delayed,
    OnHold,
}

impl std::fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MilestoneStatus::OnTrack => write!(f, "on_track"),
            MilestoneStatus::Delayed => write!(f, "delayed"),
            MilestoneStatus::OnHold => write!(f, "on_hold"),
        }
    }
}

impl std::str::FromStr for MilestoneStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_track" => Ok(MilestoneStatus::OnTrack),
            "delayed" => Ok(MilestoneStatus::Delayed),
            "on_hold" => Ok(MilestoneStatus::OnHold),
            _ => Err(ValidationError::UnknownMilestoneStatus(s.to_string())),
        }
    }
}

/// A dated checkpoint on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Unique identifier (UUID)
    pub id: String,

    /// Owning task
    pub task_id: String,

    /// Milestone name
    pub name: String,

    /// Target date
    pub date: NaiveDate,

    /// Manual status override; when set it wins over the derived status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_override: Option<MilestoneStatus>,
}

impl Milestone {
    /// Create a new Milestone with an auto-generated UUID
    pub fn new(
        task_id: impl Into<String>,
        name: impl Into<String>,
        date: NaiveDate,
        status_override: Option<MilestoneStatus>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            name: name.into(),
            date,
            status_override,
        }
    }

    /// Derive the effective status from task/project state.
    ///
    /// Precedence:
    /// 1. A manual `status_override` is returned verbatim.
    /// 2. `on_hold` when the owning project is on hold.
    /// 3. `on_track` when the owning task is done, regardless of date.
    /// 4. `delayed` when the milestone date has passed.
    /// 5. `on_track` otherwise.
    pub fn computed_status(
        &self,
        task_status: TaskStatus,
        project_status: ProjectStatus,
        today: NaiveDate,
    ) -> MilestoneStatus {
        if let Some(overridden) = self.status_override {
            return overridden;
        }
        if project_status == ProjectStatus::OnHold {
            return MilestoneStatus::OnHold;
        }
        if task_status == TaskStatus::Done {
            return MilestoneStatus::OnTrack;
        }
        if self.date < today {
            return MilestoneStatus::Delayed;
        }
        MilestoneStatus::OnTrack
    }
}
