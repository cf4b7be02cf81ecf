//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskLabelRow, TaskRow},
    schema::{tasks, tasks_labels},
};
use crate::config::{MAX_STATEMENT_TIMEOUT_MS, StoreConfig};
use crate::task::{
    domain::{
        LabelId, NewTask, PersistedTaskData, Task, TaskFilter, TaskId, TaskUpdate, Timestamp,
        UserId,
    },
    ports::{QueryError, QueryResult, TaskRepository},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use std::time::Duration;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool from the store configuration.
///
/// The pool opens its initial connections eagerly, so an unreachable server
/// is reported here rather than on first use.
///
/// # Errors
///
/// Returns [`QueryError::Connection`] when the settings are unusable or the
/// pool cannot be established.
pub fn build_pool(config: &StoreConfig) -> QueryResult<TaskPgPool> {
    config.validate().map_err(QueryError::connection)?;
    let manager = ConnectionManager::<PgConnection>::new(config.database_url());
    Pool::builder()
        .max_size(config.max_connections())
        .connection_timeout(config.connect_timeout())
        .build(manager)
        .map_err(QueryError::connection)
}

/// `PostgreSQL`-backed task repository.
///
/// Each call checks out one pooled connection on the blocking thread pool and
/// returns it when the call finishes, whatever the outcome.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
    statement_timeout: Option<Duration>,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self {
            pool,
            statement_timeout: None,
        }
    }

    /// Builds the pool and applies the configured statement timeout.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Connection`] when the pool cannot be established.
    pub fn connect(config: &StoreConfig) -> QueryResult<Self> {
        let repository = Self::new(build_pool(config)?);
        Ok(match config.statement_timeout() {
            Some(timeout) => repository.with_statement_timeout(timeout),
            None => repository,
        })
    }

    /// Returns a handle sharing this pool whose statements are cancelled by
    /// the server after `timeout`.
    #[must_use]
    pub const fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = Some(timeout);
        self
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &TaskPgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> QueryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        let timeout_sql = statement_timeout_sql(self.statement_timeout);
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(QueryError::connection)?;
            connection
                .batch_execute(&timeout_sql)
                .map_err(QueryError::statement)?;
            f(&mut connection)
        })
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "task store worker did not complete");
            QueryError::runtime(err)
        })?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list_tasks(&self, filter: TaskFilter) -> QueryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .select(TaskRow::as_select())
                .order(tasks::id.asc())
                .into_boxed();
            if let Some(task_id) = filter.task_id() {
                query = query.filter(tasks::id.eq(task_id.value()));
            }
            if let Some(author_id) = filter.author_id() {
                query = query.filter(tasks::author_id.eq(author_id.value()));
            }
            let rows = query
                .load::<TaskRow>(connection)
                .map_err(QueryError::statement)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_tasks_by_label(&self, label_id: Option<LabelId>) -> QueryResult<Vec<Task>> {
        let Some(label_id) = label_id else {
            return self.list_tasks(TaskFilter::any()).await;
        };
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .inner_join(tasks_labels::table)
                .filter(tasks_labels::label_id.eq(label_id.value()))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(QueryError::statement)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn create_task(&self, task: &NewTask) -> QueryResult<TaskId> {
        let task = task.clone();
        self.run_blocking(move |connection| {
            let id = diesel::insert_into(tasks::table)
                .values(&NewTaskRow {
                    opened: task.opened().as_epoch_seconds(),
                    title: task.title(),
                    content: task.content(),
                })
                .returning(tasks::id)
                .get_result::<i64>(connection)
                .map_err(QueryError::statement)?;
            TaskId::new(id).map_err(QueryError::decode)
        })
        .await
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> QueryResult<usize> {
        let update = update.clone();
        self.run_blocking(move |connection| {
            diesel::update(tasks::table.find(id.value()))
                .set(&TaskChangeset {
                    author_id: update.author_id().map(UserId::value),
                    assigned_id: update.assigned_id().map(UserId::value),
                    title: update.title(),
                    content: update.content(),
                })
                .execute(connection)
                .map_err(QueryError::statement)
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> QueryResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(tasks::table.find(id.value()))
                .execute(connection)
                .map_err(QueryError::statement)
        })
        .await
    }

    async fn attach_label(&self, task_id: TaskId, label_id: LabelId) -> QueryResult<()> {
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks_labels::table)
                .values(&TaskLabelRow {
                    task_id: task_id.value(),
                    label_id: label_id.value(),
                })
                .on_conflict_do_nothing()
                .execute(connection)
                .map_err(QueryError::statement)?;
            Ok(())
        })
        .await
    }

    async fn detach_label(&self, task_id: TaskId, label_id: LabelId) -> QueryResult<usize> {
        self.run_blocking(move |connection| {
            diesel::delete(
                tasks_labels::table
                    .filter(tasks_labels::task_id.eq(task_id.value()))
                    .filter(tasks_labels::label_id.eq(label_id.value())),
            )
            .execute(connection)
            .map_err(QueryError::statement)
        })
        .await
    }
}

/// `0` disables the server-side limit.
fn statement_timeout_sql(timeout: Option<Duration>) -> String {
    let millis = timeout.map_or(0, |value| {
        u64::try_from(value.as_millis())
            .unwrap_or(u64::MAX)
            .min(MAX_STATEMENT_TIMEOUT_MS)
    });
    format!("SET statement_timeout = {millis}")
}

fn row_to_task(row: TaskRow) -> QueryResult<Task> {
    let TaskRow {
        id,
        opened,
        closed,
        author_id,
        assigned_id,
        title,
        content,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id).map_err(QueryError::decode)?,
        opened: Timestamp::from_epoch_seconds(opened),
        closed: closed.map(Timestamp::from_epoch_seconds),
        author_id: author_id
            .map(UserId::new)
            .transpose()
            .map_err(QueryError::decode)?,
        assigned_id: assigned_id
            .map(UserId::new)
            .transpose()
            .map_err(QueryError::decode)?,
        title,
        content,
    };
    Ok(Task::from_persisted(data))
}
