//! Domain model for task records.
//!
//! The domain holds the task record, the payloads used to create and modify
//! it, and the filters used to list it, without any storage concerns.

mod error;
mod filter;
mod ids;
mod task;

pub use error::TaskDomainError;
pub use filter::TaskFilter;
pub use ids::{LabelId, TaskId, Timestamp, UserId};
pub use task::{NewTask, PersistedTaskData, Task, TaskDraft, TaskUpdate};
