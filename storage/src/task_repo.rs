//! Task repository: the `tasks` table behind the polling worker.
//!
//! Producers `insert` planned items; the worker reads them through [`scheduler::TaskSource`].

use async_trait::async_trait;
use chrono::Utc;
use scheduler::{TaskOutcome, TaskSource, TaskStatus, TaskStoreError, WorkItem};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::TaskRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct TaskRepository {
    pool_manager: SqlitePoolManager,
}

impl TaskRepository {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating tasks table if not exists");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                task TEXT NOT NULL,
                status TEXT NOT NULL,
                payload TEXT NOT NULL,
                result TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_status_created ON tasks(status, created_at)")
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn insert(&self, item: &WorkItem) -> Result<(), StorageError> {
        let record = TaskRecord::from_item(item);

        sqlx::query(
            r#"
            INSERT INTO tasks (id, task, status, payload, result, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.task)
        .bind(&record.status)
        .bind(&record.payload)
        .bind(&record.result)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(id = %record.id, task = %record.task, "Inserted task");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<TaskRecord>, StorageError> {
        let record = sqlx::query_as::<_, TaskRecord>("SELECT * FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(record)
    }

    pub async fn planned(&self, limit: u32) -> Result<Vec<WorkItem>, StorageError> {
        let records = sqlx::query_as::<_, TaskRecord>(
            "SELECT * FROM tasks WHERE status = ? ORDER BY created_at ASC, rowid ASC LIMIT ?",
        )
        .bind(TaskStatus::Planned.as_str())
        .bind(i64::from(limit))
        .fetch_all(self.pool_manager.pool())
        .await?;

        records.into_iter().map(WorkItem::try_from).collect()
    }

    /// One `UPDATE ... WHERE id IN (...)` for the whole batch.
    pub async fn set_in_progress(&self, ids: &[Uuid]) -> Result<u64, StorageError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("UPDATE tasks SET status = ?, updated_at = ? WHERE id IN ({placeholders})");
        let mut query = sqlx::query(&sql)
            .bind(TaskStatus::InProgress.as_str())
            .bind(Utc::now());
        for id in ids {
            query = query.bind(id.to_string());
        }

        let result = query.execute(self.pool_manager.pool()).await?;
        Ok(result.rows_affected())
    }

    pub async fn record_outcome(&self, outcome: &TaskOutcome) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE tasks SET status = ?, result = ?, updated_at = ? WHERE id = ?")
            .bind(outcome.status.as_str())
            .bind(outcome.result.to_string())
            .bind(Utc::now())
            .bind(outcome.id.to_string())
            .execute(self.pool_manager.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(outcome.id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskSource for TaskRepository {
    async fn get_planned(&self, limit: u32) -> Result<Vec<WorkItem>, TaskStoreError> {
        Ok(self.planned(limit).await?)
    }

    async fn mark_in_progress(&self, ids: &[Uuid]) -> Result<(), TaskStoreError> {
        self.set_in_progress(ids).await?;
        Ok(())
    }

    async fn save_outcome(&self, outcome: &TaskOutcome) -> Result<(), TaskStoreError> {
        Ok(self.record_outcome(outcome).await?)
    }
}
