use thiserror::Error;

/// Errors from a [`crate::TaskSource`].
#[derive(Error, Debug)]
pub enum TaskStoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Invalid task status: {0}")]
    InvalidStatus(String),
}

/// Errors that end the worker loop, or refuse to start it.
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Task store error: {0}")]
    Store(#[from] TaskStoreError),

    #[error("Task runner error: {0}")]
    Runner(String),

    #[error("Worker is already running")]
    AlreadyRunning,

    #[error("Previous run ended and must be stopped before restarting")]
    NotCollected,

    #[error("Worker task failed: {0}")]
    Join(String),
}
