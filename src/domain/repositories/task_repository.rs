use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::task::Task;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("task not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a task and return its assigned id; `task.id` is ignored
    async fn add_task(&self, task: Task) -> Result<i64>;

    async fn get_task(&self, id: i64) -> Result<Task>;

    /// Tasks ordered by date, earliest first
    async fn list_tasks(&self, limit: usize) -> Result<Vec<Task>>;

    /// Overwrite every field of an existing task
    async fn update_task(&self, task: &Task) -> Result<()>;

    async fn delete_task(&self, id: i64) -> Result<()>;
}
