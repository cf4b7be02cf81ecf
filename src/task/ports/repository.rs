//! Repository port for task persistence and label association.

use crate::task::domain::{LabelId, NewTask, Task, TaskFilter, TaskId, TaskUpdate};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Task persistence contract.
///
/// Every method maps onto a single statement against the backing store.
/// Listings are returned in ascending id order and an empty listing is a
/// success.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns every task matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the query fails or a row cannot be decoded.
    async fn list_tasks(&self, filter: TaskFilter) -> QueryResult<Vec<Task>>;

    /// Returns every task associated with `label_id`, or every task when no
    /// label is given.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the query fails or a row cannot be decoded.
    async fn list_tasks_by_label(&self, label_id: Option<LabelId>) -> QueryResult<Vec<Task>>;

    /// Inserts a task and returns its generated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on constraint violations or connectivity
    /// failures.
    async fn create_task(&self, task: &NewTask) -> QueryResult<TaskId>;

    /// Overwrites the mutable fields of a task and returns the number of rows
    /// affected.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the statement fails.
    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> QueryResult<usize>;

    /// Deletes a task and returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the statement fails.
    async fn delete_task(&self, id: TaskId) -> QueryResult<usize>;

    /// Associates a label with a task. Existing associations are left as is.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the task does not exist or the statement
    /// fails.
    async fn attach_label(&self, task_id: TaskId, label_id: LabelId) -> QueryResult<()>;

    /// Removes a label association and returns the number of rows affected.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the statement fails.
    async fn detach_label(&self, task_id: TaskId, label_id: LabelId) -> QueryResult<usize>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The connection pool could not be built or no connection was available.
    #[error("connection error: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// The backing store rejected or aborted the statement.
    #[error("statement failed: {0}")]
    Statement(Arc<dyn std::error::Error + Send + Sync>),

    /// A result row could not be mapped into a task.
    #[error("row decoding failed: {0}")]
    Decode(Arc<dyn std::error::Error + Send + Sync>),

    /// The blocking worker running the statement failed.
    #[error("blocking task failed: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),

    /// The in-process store is unusable.
    #[error("task store unavailable: {0}")]
    Unavailable(String),
}

impl QueryError {
    /// Wraps a connection or pool error.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Wraps a statement execution error.
    pub fn statement(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Statement(Arc::new(err))
    }

    /// Wraps a row decoding error.
    pub fn decode(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode(Arc::new(err))
    }

    /// Wraps a blocking worker error.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
