//! Task model
//!
//! Tasks belong to a project, carry a status and priority, and may be
//! linked to other tasks through directed dependency edges (`task` depends
//! on `depends_on`). The dependency graph is stored as-is: no cycle
//! detection or topological ordering is performed.

use crate::models::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Todo => write!(f, "todo"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Done => write!(f, "done"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(ValidationError::UnknownTaskStatus(s.to_string())),
        }
    }
}

/// Task priority, ordered from Low to Critical
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(ValidationError::UnknownPriority(s.to_string())),
        }
    }
}

/// A unit of work within a project
///
/// # Fields
///
/// - `id`: Unique identifier (UUID)
/// - `title`: Short summary line
/// - `description`: Free-text details
/// - `project_id`: Owning project (tasks never exist outside a project)
/// - `start_date` / `end_date`: Planned calendar window (drives the Gantt
///   feed and the overdue calculation)
/// - `status`: Workflow state
/// - `priority`: Scheduling hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (UUID)
    pub id: String,

    /// Short summary line
    pub title: String,

    /// Free-text details
    pub description: String,

    /// Owning project
    pub project_id: String,

    /// Planned start date
    pub start_date: NaiveDate,

    /// Planned end date
    pub end_date: NaiveDate,

    /// Workflow state
    pub status: TaskStatus,

    /// Scheduling priority
    pub priority: Priority,
}

impl Task {
    /// Create a new Task with an auto-generated UUID
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        project_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: TaskStatus,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            project_id: project_id.into(),
            start_date,
            end_date,
            status,
            priority,
        }
    }

    /// Completion percentage derived from status: done is 100,
    /// in_progress is 50, everything else is 0.
    pub fn progress(&self) -> u8 {
        match self.status {
            TaskStatus::Done => 100,
            TaskStatus::InProgress => 50,
            TaskStatus::Todo => 0,
        }
    }

    /// A task is overdue when its end date has passed and it is not done.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.end_date < today && self.status != TaskStatus::Done
    }
}

/// Assignment of a person to a task, optionally flagged as the task lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    /// Unique identifier (UUID)
    pub id: String,

    /// Assigned task
    pub task_id: String,

    /// Assigned person
    pub person_id: String,

    /// Whether this person leads the task (at most one per task by
    /// convention; the store does not enforce it)
    pub is_lead: bool,
}

impl TaskAssignment {
    /// Create a new TaskAssignment with an auto-generated UUID
    pub fn new(task_id: impl Into<String>, person_id: impl Into<String>, is_lead: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task_id: task_id.into(),
            person_id: person_id.into(),
            is_lead,
        }
    }
}
