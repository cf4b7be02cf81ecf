//! Error types for task domain validation.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is not a positive integer.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The user identifier is not a positive integer.
    #[error("invalid user identifier {0}, expected a positive integer")]
    InvalidUserId(i64),

    /// The label identifier is not a positive integer.
    #[error("invalid label identifier {0}, expected a positive integer")]
    InvalidLabelId(i64),

    /// The timestamp cannot be represented as a calendar date.
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}
