//! # Scheduler
//!
//! [`PollingWorker`] runs `fetch → claim → execute → persist → sleep` until stopped. Tasks come from
//! a [`TaskSource`] (the SQLite repository in the `storage` crate) and are executed by a
//! [`TaskRunner`].

pub mod config;
pub mod error;
pub mod source;
pub mod task;
pub mod worker;

pub use config::SchedulerConfig;
pub use error::{TaskStoreError, WorkerError};
pub use source::{CompleteAllRunner, TaskRunner, TaskSource};
pub use task::{TaskOutcome, TaskStatus, WorkItem};
pub use worker::PollingWorker;
