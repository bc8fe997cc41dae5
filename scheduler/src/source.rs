//! Collaborators of the worker: where tasks come from and who executes them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{TaskStoreError, WorkerError};
use crate::task::{TaskOutcome, TaskStatus, WorkItem};

#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Up to `limit` items in `Planned` state, oldest first.
    async fn get_planned(&self, limit: u32) -> Result<Vec<WorkItem>, TaskStoreError>;

    /// Moves all `ids` to `InProgress` in one bulk update.
    async fn mark_in_progress(&self, ids: &[Uuid]) -> Result<(), TaskStoreError>;

    async fn save_outcome(&self, outcome: &TaskOutcome) -> Result<(), TaskStoreError>;
}

#[async_trait]
pub trait TaskRunner: Send + Sync {
    async fn run(&self, items: &[WorkItem]) -> Result<Vec<TaskOutcome>, WorkerError>;
}

/// Marks every item done with an empty result.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompleteAllRunner;

#[async_trait]
impl TaskRunner for CompleteAllRunner {
    async fn run(&self, items: &[WorkItem]) -> Result<Vec<TaskOutcome>, WorkerError> {
        Ok(items
            .iter()
            .map(|item| TaskOutcome {
                id: item.id,
                status: TaskStatus::Done,
                result: serde_json::json!({}),
            })
            .collect())
    }
}
