//! Service Layer Error Types
//!
//! This module defines error types for service-layer operations, providing
//! detailed error handling for business logic failures.

use crate::db::DatabaseError;
use crate::models::ValidationError;
use thiserror::Error;

/// Service operation errors
///
/// Provides high-level error types for all service operations, with
/// entity-specific not-found variants and proper error chaining.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Team not found by ID
    #[error("Team not found: {id}")]
    TeamNotFound { id: String },

    /// Person not found by ID
    #[error("Person not found: {id}")]
    PersonNotFound { id: String },

    /// Project not found by ID
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    /// Task not found by ID
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    /// Milestone not found by ID
    #[error("Milestone not found: {id}")]
    MilestoneNotFound { id: String },

    /// Validation failed (unknown status/priority strings and the like)
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Database operation failed
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    /// Store query failed
    #[error("Storage operation failed: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    /// Create a team not found error
    pub fn team_not_found(id: impl Into<String>) -> Self {
        Self::TeamNotFound { id: id.into() }
    }

    /// Create a person not found error
    pub fn person_not_found(id: impl Into<String>) -> Self {
        Self::PersonNotFound { id: id.into() }
    }

    /// Create a project not found error
    pub fn project_not_found(id: impl Into<String>) -> Self {
        Self::ProjectNotFound { id: id.into() }
    }

    /// Create a task not found error
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::TaskNotFound { id: id.into() }
    }

    /// Create a milestone not found error
    pub fn milestone_not_found(id: impl Into<String>) -> Self {
        Self::MilestoneNotFound { id: id.into() }
    }
}
