//! In-memory repository for task store tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{LabelId, NewTask, Task, TaskFilter, TaskId, TaskUpdate},
    ports::{QueryError, QueryResult, TaskRepository},
};

/// Thread-safe in-memory task repository.
///
/// Mirrors the `PostgreSQL` adapter: identifiers are assigned from a
/// sequence starting at 1, listings come back in ascending id order, and
/// deleting a task drops its label associations.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    labels: BTreeSet<(TaskId, LabelId)>,
    last_id: i64,
}

impl InMemoryTaskState {
    fn next_id(&mut self) -> QueryResult<TaskId> {
        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| QueryError::Unavailable("task id sequence exhausted".to_owned()))?;
        let id = TaskId::new(next).map_err(QueryError::decode)?;
        self.last_id = next;
        Ok(id)
    }

    fn has_label(&self, task_id: TaskId, label_id: LabelId) -> bool {
        self.labels.contains(&(task_id, label_id))
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> QueryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state
            .read()
            .map_err(|err| QueryError::Unavailable(err.to_string()))
    }

    fn write(&self) -> QueryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state
            .write()
            .map_err(|err| QueryError::Unavailable(err.to_string()))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_tasks(&self, filter: TaskFilter) -> QueryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn list_tasks_by_label(&self, label_id: Option<LabelId>) -> QueryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state
            .tasks
            .values()
            .filter(|task| label_id.is_none_or(|label| state.has_label(task.id(), label)))
            .cloned()
            .collect())
    }

    async fn create_task(&self, task: &NewTask) -> QueryResult<TaskId> {
        let mut state = self.write()?;
        let id = state.next_id()?;
        state.tasks.insert(id, task.clone().into_task(id));
        Ok(id)
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> QueryResult<usize> {
        let mut state = self.write()?;
        let Some(task) = state.tasks.get_mut(&id) else {
            return Ok(0);
        };
        task.apply(update);
        Ok(1)
    }

    async fn delete_task(&self, id: TaskId) -> QueryResult<usize> {
        let mut state = self.write()?;
        if state.tasks.remove(&id).is_none() {
            return Ok(0);
        }
        state.labels.retain(|(task_id, _)| *task_id != id);
        Ok(1)
    }

    async fn attach_label(&self, task_id: TaskId, label_id: LabelId) -> QueryResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task_id) {
            return Err(QueryError::statement(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("task {task_id} does not exist"),
            )));
        }
        state.labels.insert((task_id, label_id));
        Ok(())
    }

    async fn detach_label(&self, task_id: TaskId, label_id: LabelId) -> QueryResult<usize> {
        let mut state = self.write()?;
        Ok(usize::from(state.labels.remove(&(task_id, label_id))))
    }
}
