//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `PeopleService` - teams and people, search, workload views
//! - `ProjectService` - project CRUD and the Gantt data feed
//! - `TaskService` - tasks, tags, dependencies, assignments, status
//!   updates (with @mention resolution), milestones
//! - `DashboardService` - aggregate counts and highlights
//! - `PersonDirectory` - the in-memory name index backing mention lookup
//!
//! Services coordinate between the database layer and application logic,
//! implementing business rules and orchestrating multi-table operations.

pub mod dashboard;
pub mod directory;
pub mod error;
pub mod people_service;
pub mod project_service;
pub mod task_service;

pub use dashboard::{DashboardService, DashboardSummary};
pub use directory::PersonDirectory;
pub use error::ServiceError;
pub use people_service::{PeopleService, PersonWorkload, ProjectTasks};
pub use project_service::{GanttBar, ProjectInput, ProjectService};
pub use task_service::{
    MilestoneView, QuickUpdate, StatusUpdateView, TaskAssignee, TaskDetail, TaskInput,
    TaskService,
};
