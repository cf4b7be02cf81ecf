//! Port contracts for task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the task store.

pub mod repository;

pub use repository::{QueryError, QueryResult, TaskRepository};
