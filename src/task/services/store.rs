//! Task store service: the public entry point for task reads and writes.

use crate::config::StoreConfig;
use crate::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{LabelId, NewTask, Task, TaskDraft, TaskFilter, TaskId, TaskUpdate, UserId},
    ports::{QueryError, QueryResult, TaskRepository},
};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;

/// Task store over a [`TaskRepository`].
///
/// Operations are independent of each other; the store holds no state beyond
/// the shared repository handle and clock, so it can be cloned freely and
/// used from concurrent tasks.
#[derive(Clone)]
pub struct TaskStore<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl TaskStore<PostgresTaskRepository, DefaultClock> {
    /// Connects to `PostgreSQL` using `config`.
    ///
    /// This blocks for up to [`StoreConfig::connect_timeout`] while the pool
    /// opens its initial connections. From async code use
    /// [`TaskStore::connect_async`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Connection`] when the settings are unusable or
    /// the database cannot be reached.
    pub fn connect(config: &StoreConfig) -> QueryResult<Self> {
        let repository = PostgresTaskRepository::connect(config)?;
        tracing::debug!(
            max_connections = config.max_connections(),
            "task store connected"
        );
        Ok(Self::new(Arc::new(repository), Arc::new(DefaultClock)))
    }

    /// Connects like [`TaskStore::connect`] on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Connection`] when the settings are unusable or
    /// the database cannot be reached, and [`QueryError::Runtime`] when the
    /// blocking worker fails.
    pub async fn connect_async(config: StoreConfig) -> QueryResult<Self> {
        tokio::task::spawn_blocking(move || Self::connect(&config))
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "task store connect worker did not complete");
                QueryError::runtime(err)
            })?
    }
}

impl<R, C> TaskStore<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a store over an existing repository and clock.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Lists tasks matching `filter` in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the query fails or a
    /// row cannot be decoded.
    pub async fn list_tasks(&self, filter: TaskFilter) -> QueryResult<Vec<Task>> {
        let tasks = self.repository.list_tasks(filter).await?;
        tracing::debug!(
            task_id = filter.task_id().map(TaskId::value),
            author_id = filter.author_id().map(UserId::value),
            rows = tasks.len(),
            "listed tasks"
        );
        Ok(tasks)
    }

    /// Lists tasks written by `author_id`, or every task when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the query fails or a
    /// row cannot be decoded.
    pub async fn list_tasks_by_author(&self, author_id: Option<UserId>) -> QueryResult<Vec<Task>> {
        let filter = author_id.map_or_else(TaskFilter::any, TaskFilter::by_author);
        self.list_tasks(filter).await
    }

    /// Lists tasks carrying `label_id`, or every task when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the query fails or a
    /// row cannot be decoded.
    pub async fn list_tasks_by_label(&self, label_id: Option<LabelId>) -> QueryResult<Vec<Task>> {
        let tasks = self.repository.list_tasks_by_label(label_id).await?;
        tracing::debug!(
            label_id = label_id.map(LabelId::value),
            rows = tasks.len(),
            "listed tasks by label"
        );
        Ok(tasks)
    }

    /// Creates a task from `draft` and returns its generated id.
    ///
    /// Only the title and body are stored; the task opens now according to
    /// the store's clock.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on constraint violations or
    /// connectivity failures.
    pub async fn create_task(&self, draft: TaskDraft) -> QueryResult<TaskId> {
        let new_task = NewTask::open(draft, &*self.clock);
        let id = self.repository.create_task(&new_task).await?;
        tracing::debug!(task_id = id.value(), "created task");
        Ok(id)
    }

    /// Overwrites the author, assignee, title and body of task `id`.
    ///
    /// Returns `id` whether or not a task with that id exists.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the statement fails.
    pub async fn update_task(&self, id: TaskId, update: TaskUpdate) -> QueryResult<TaskId> {
        let affected = self.repository.update_task(id, &update).await?;
        log_write("updated task", id, affected);
        Ok(id)
    }

    /// Deletes task `id` along with its label associations.
    ///
    /// Returns `id` whether or not a task with that id existed.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the statement fails.
    pub async fn delete_task(&self, id: TaskId) -> QueryResult<TaskId> {
        let affected = self.repository.delete_task(id).await?;
        log_write("deleted task", id, affected);
        Ok(id)
    }

    /// Associates `label_id` with task `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the task does not
    /// exist or the statement fails.
    pub async fn attach_label(&self, task_id: TaskId, label_id: LabelId) -> QueryResult<()> {
        self.repository.attach_label(task_id, label_id).await?;
        tracing::debug!(
            task_id = task_id.value(),
            label_id = label_id.value(),
            "attached label"
        );
        Ok(())
    }

    /// Removes the association between `label_id` and task `task_id`.
    ///
    /// Detaching a label the task does not carry is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the statement fails.
    pub async fn detach_label(&self, task_id: TaskId, label_id: LabelId) -> QueryResult<()> {
        let affected = self.repository.detach_label(task_id, label_id).await?;
        tracing::debug!(
            task_id = task_id.value(),
            label_id = label_id.value(),
            rows = affected,
            "detached label"
        );
        Ok(())
    }
}

fn log_write(action: &'static str, id: TaskId, affected: usize) {
    if affected == 0 {
        tracing::debug!(task_id = id.value(), "{action}: no matching row");
    } else {
        tracing::debug!(task_id = id.value(), rows = affected, "{action}");
    }
}
