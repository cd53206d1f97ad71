//! Model Validation Error Types
//!
//! Errors raised when raw database or user-supplied strings cannot be
//! interpreted as typed model values.

use thiserror::Error;

/// Validation errors for model construction and enum parsing
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Unrecognized task status string
    #[error("Unknown task status: {0}")]
    UnknownTaskStatus(String),

    /// Unrecognized task priority string
    #[error("Unknown task priority: {0}")]
    UnknownPriority(String),

    /// Unrecognized project status string
    #[error("Unknown project status: {0}")]
    UnknownProjectStatus(String),

    /// Unrecognized milestone status string
    #[error("Unknown milestone status: {0}")]
    UnknownMilestoneStatus(String),
}
