//! Task record and the payloads used to create and modify it.

use super::{TaskId, Timestamp, UserId};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task record as stored in the `tasks` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    opened: Timestamp,
    closed: Option<Timestamp>,
    author_id: Option<UserId>,
    assigned_id: Option<UserId>,
    title: String,
    content: String,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Time the task was opened.
    pub opened: Timestamp,
    /// Time the task was closed, if it has been.
    pub closed: Option<Timestamp>,
    /// Author of the task, if recorded.
    pub author_id: Option<UserId>,
    /// Assignee of the task, if recorded.
    pub assigned_id: Option<UserId>,
    /// Task title.
    pub title: String,
    /// Free-text task body.
    pub content: String,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            opened: data.opened,
            closed: data.closed,
            author_id: data.author_id,
            assigned_id: data.assigned_id,
            title: data.title,
            content: data.content,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the time the task was opened.
    #[must_use]
    pub const fn opened(&self) -> Timestamp {
        self.opened
    }

    /// Returns the time the task was closed, or `None` while it is open.
    #[must_use]
    pub const fn closed(&self) -> Option<Timestamp> {
        self.closed
    }

    /// Returns whether the task is still open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.closed.is_none()
    }

    /// Returns the author, if recorded.
    #[must_use]
    pub const fn author_id(&self) -> Option<UserId> {
        self.author_id
    }

    /// Returns the assignee, if recorded.
    #[must_use]
    pub const fn assigned_id(&self) -> Option<UserId> {
        self.assigned_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Overwrites the mutable fields with the values in `update`.
    ///
    /// The identifier and the open/close timestamps are left untouched.
    pub fn apply(&mut self, update: &TaskUpdate) {
        self.author_id = update.author_id;
        self.assigned_id = update.assigned_id;
        self.title.clone_from(&update.title);
        self.content.clone_from(&update.content);
    }
}

/// Caller-supplied fields for a new task.
///
/// Only the title and body are persisted on creation; author and assignee are
/// set through [`TaskUpdate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    content: String,
}

impl TaskDraft {
    /// Creates a draft with the given title and body.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Returns the draft title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the draft body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Insert payload handed to repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: String,
    content: String,
    opened: Timestamp,
}

impl NewTask {
    /// Stamps a draft with the current time from `clock`.
    #[must_use]
    pub fn open(draft: TaskDraft, clock: &impl Clock) -> Self {
        Self::open_at(draft, Timestamp::now(clock))
    }

    /// Stamps a draft with an explicit opening time.
    #[must_use]
    pub fn open_at(draft: TaskDraft, opened: Timestamp) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            opened,
        }
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the opening timestamp.
    #[must_use]
    pub const fn opened(&self) -> Timestamp {
        self.opened
    }

    /// Builds the stored record once the repository has assigned an id.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task::from_persisted(PersistedTaskData {
            id,
            opened: self.opened,
            closed: None,
            author_id: None,
            assigned_id: None,
            title: self.title,
            content: self.content,
        })
    }
}

/// Full replacement of a task's mutable fields.
///
/// Absent author or assignee values are written as empty, so an update always
/// describes the complete mutable state of the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    author_id: Option<UserId>,
    assigned_id: Option<UserId>,
    title: String,
    content: String,
}

impl TaskUpdate {
    /// Creates an update with no author or assignee.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author_id: None,
            assigned_id: None,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Starts from the current mutable state of `task`.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            author_id: task.author_id,
            assigned_id: task.assigned_id,
            title: task.title.clone(),
            content: task.content.clone(),
        }
    }

    /// Sets the author.
    #[must_use]
    pub const fn with_author(mut self, author_id: UserId) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assigned_id: UserId) -> Self {
        self.assigned_id = Some(assigned_id);
        self
    }

    /// Clears the assignee.
    #[must_use]
    pub const fn unassigned(mut self) -> Self {
        self.assigned_id = None;
        self
    }

    /// Returns the author to write.
    #[must_use]
    pub const fn author_id(&self) -> Option<UserId> {
        self.author_id
    }

    /// Returns the assignee to write.
    #[must_use]
    pub const fn assigned_id(&self) -> Option<UserId> {
        self.assigned_id
    }

    /// Returns the title to write.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body to write.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
