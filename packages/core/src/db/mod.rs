//! Database Layer
//!
//! This module handles all database interactions using libsql:
//!
//! - Database initialization and connection management
//! - Idempotent relational schema (CREATE TABLE IF NOT EXISTS)
//! - Typed store operations with row/model conversion
//!
//! # Architecture
//!
//! Taskmaster uses an embedded libsql/SQLite database. The schema is
//! fixed and created up front; there are no migrations. Association
//! tables (`task_tags`, `task_dependencies`, `status_update_mentions`)
//! use composite primary keys with cascading deletes so removing an
//! entity cleans up its links automatically.

mod database;
mod error;
mod store;

pub use database::DatabaseService;
pub use error::DatabaseError;
pub use store::{TaskFilter, TrackerStore};
