//! Task record model for persistence.
//!
//! Maps to the `tasks` table; converts to and from `scheduler::WorkItem`.

use chrono::{DateTime, Utc};
use scheduler::{TaskStatus, WorkItem};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskRecord {
    pub id: String,
    pub task: String,
    pub status: String,
    pub payload: String,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    pub fn from_item(item: &WorkItem) -> Self {
        let now = Utc::now();
        Self {
            id: item.id.to_string(),
            task: item.task.clone(),
            status: item.status.as_str().to_string(),
            payload: item.payload.to_string(),
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Parsed result JSON, if the task has finished.
    pub fn result_json(&self) -> Result<Option<serde_json::Value>, StorageError> {
        self.result
            .as_deref()
            .map(|raw| serde_json::from_str(raw).map_err(|e| StorageError::Corrupt(e.to_string())))
            .transpose()
    }
}

impl TryFrom<TaskRecord> for WorkItem {
    type Error = StorageError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&record.id)
            .map_err(|e| StorageError::Corrupt(format!("task id {}: {e}", record.id)))?;
        let status: TaskStatus = record
            .status
            .parse()
            .map_err(|_| StorageError::Corrupt(format!("task {} status {}", record.id, record.status)))?;
        let payload = serde_json::from_str(&record.payload)
            .map_err(|e| StorageError::Corrupt(format!("task {} payload: {e}", record.id)))?;
        Ok(WorkItem {
            id,
            task: record.task,
            status,
            payload,
        })
    }
}
