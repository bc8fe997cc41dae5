//! Storage error types.
//!
//! Used by the task repository; converted into `scheduler::TaskStoreError` at the worker seam.

use scheduler::TaskStoreError;
use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

impl From<StorageError> for TaskStoreError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Database(msg) => TaskStoreError::Database(msg),
            StorageError::Corrupt(msg) => TaskStoreError::Serialization(msg),
            StorageError::NotFound(id) => TaskStoreError::NotFound(id),
        }
    }
}
