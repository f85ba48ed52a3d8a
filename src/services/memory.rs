//! Process-local task store used when no remote API is configured

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::TaskApi;
use crate::{
    error::ApiError,
    state::{Task, TaskId},
};

#[derive(Debug, Default)]
struct Store {
    next_id: u64,
    tasks: Vec<Task>,
}

/// In-memory task store handing out sequential ids
#[derive(Debug, Default)]
pub struct MemoryTaskApi {
    store: Mutex<Store>,
}

impl MemoryTaskApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with open tasks
    pub fn with_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tasks: Vec<Task> = titles
            .into_iter()
            .enumerate()
            .map(|(i, title)| Task::new((i + 1).to_string(), title))
            .collect();
        Self {
            store: Mutex::new(Store {
                next_id: tasks.len() as u64,
                tasks,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        // A poisoned store still holds consistent data: every mutation is a
        // single push/remove/assign.
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TaskApi for MemoryTaskApi {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        Ok(self.lock().tasks.clone())
    }

    async fn create_task(&self, title: &str) -> Result<Task, ApiError> {
        let mut store = self.lock();
        store.next_id += 1;
        let task = Task::new(store.next_id.to_string(), title);
        store.tasks.push(task.clone());
        debug!("Stored task {} in memory", task.id);
        Ok(task)
    }

    async fn complete_task(&self, task: &Task) -> Result<(), ApiError> {
        let mut store = self.lock();
        let stored = store
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| ApiError::NotFound(task.id.clone()))?;
        stored.completed = true;
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let mut store = self.lock();
        let before = store.tasks.len();
        store.tasks.retain(|t| &t.id != id);
        if store.tasks.len() == before {
            return Err(ApiError::NotFound(id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_sequential_ids_after_seed() {
        let api = MemoryTaskApi::with_titles(["Plan", "Write"]);
        let task = api.create_task("Review").await.unwrap();

        assert_eq!(task.id, TaskId::new("3"));
        let titles: Vec<String> = api
            .fetch_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["Plan", "Write", "Review"]);
    }

    #[tokio::test]
    async fn complete_and_delete_unknown_task_fail() {
        let api = MemoryTaskApi::new();
        let ghost = Task::new("42", "Ghost");

        assert!(matches!(api.complete_task(&ghost).await, Err(ApiError::NotFound(_))));
        assert!(matches!(api.delete_task(&ghost.id).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn complete_marks_stored_task() {
        let api = MemoryTaskApi::with_titles(["Plan"]);
        let task = api.fetch_tasks().await.unwrap().remove(0);

        api.complete_task(&task).await.unwrap();
        assert!(api.fetch_tasks().await.unwrap()[0].completed);

        api.delete_task(&task.id).await.unwrap();
        assert!(api.fetch_tasks().await.unwrap().is_empty());
    }
}
