//! Query filter for task listings.

use super::{Task, TaskId, UserId};

/// Conjunction of optional predicates over the `tasks` relation.
///
/// A `None` field places no constraint on that column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    task_id: Option<TaskId>,
    author_id: Option<UserId>,
}

impl TaskFilter {
    /// Matches every task.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            task_id: None,
            author_id: None,
        }
    }

    /// Matches the task with the given identifier.
    #[must_use]
    pub const fn by_id(task_id: TaskId) -> Self {
        Self::any().with_task_id(task_id)
    }

    /// Matches tasks written by the given author.
    #[must_use]
    pub const fn by_author(author_id: UserId) -> Self {
        Self::any().with_author(author_id)
    }

    /// Restricts the filter to one task identifier.
    #[must_use]
    pub const fn with_task_id(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Restricts the filter to one author.
    #[must_use]
    pub const fn with_author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Returns the task identifier constraint.
    #[must_use]
    pub const fn task_id(&self) -> Option<TaskId> {
        self.task_id
    }

    /// Returns the author constraint.
    #[must_use]
    pub const fn author_id(&self) -> Option<UserId> {
        self.author_id
    }

    /// Evaluates the filter against a task in memory.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let id_matches = self.task_id.is_none_or(|id| id == task.id());
        let author_matches = self
            .author_id
            .is_none_or(|author| task.author_id() == Some(author));
        id_matches && author_matches
    }
}
