//! Storage crate: task persistence for the polling worker.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – TaskRecord
//! - [`task_repo`] – TaskRepository (SQLite), implements `scheduler::TaskSource`
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod sqlite_pool;
mod task_repo;

pub use error::StorageError;
pub use models::TaskRecord;
pub use sqlite_pool::SqlitePoolManager;
pub use task_repo::TaskRepository;
