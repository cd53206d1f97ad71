//! Taskmaster Core Business Logic Layer
//!
//! This crate provides the core data management, services, and text
//! annotation for the Taskmaster project/task-tracking system.
//!
//! # Architecture
//!
//! - **Typed models**: Teams, people, projects, tasks, tags, status
//!   updates, milestones - with derived fields as pure functions
//! - **libsql**: Embedded SQLite database with a fixed relational schema
//!   (no migrations)
//! - **Services**: Business operations over the store - CRUD, dashboard
//!   summary, Gantt feed, mention persistence
//! - **Text annotation**: Pure routine turning raw status-update text
//!   into safe markup with URLs linkified and @mentions resolved
//!
//! The HTTP/presentation layer is an external consumer of this crate; it
//! calls the services and embeds [`text::annotate`] output where
//! status-update bodies are displayed.
//!
//! # Modules
//!
//! - [`models`] - Data structures (Task, Person, Milestone, etc.)
//! - [`db`] - Database layer with libsql integration
//! - [`services`] - Business services (TaskService, DashboardService, etc.)
//! - [`text`] - Mention/link annotator and typed markup fragments

pub mod db;
pub mod models;
pub mod services;
pub mod text;

// Re-export commonly used types
pub use db::*;
pub use models::*;
pub use services::*;
pub use text::*;
