//! Task store collaborator

use async_trait::async_trait;

use crate::{
    error::ApiError,
    state::{Task, TaskId},
};

/// Remote task store the controller reads from and persists to
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch every task in store order
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// Create an open task; the store assigns its id
    async fn create_task(&self, title: &str) -> Result<Task, ApiError>;

    /// Persist `task` as completed
    async fn complete_task(&self, task: &Task) -> Result<(), ApiError>;

    async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError>;
}
