//! Polling worker with cooperative cancellation.
//!
//! Only the fetch and the sleep are cancellation points. Once a batch is fetched, its claim, execution
//! and persistence run to completion, so a stop never leaves items claimed but unpersisted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::SchedulerConfig;
use crate::error::WorkerError;
use crate::source::{TaskRunner, TaskSource};
use crate::task::WorkItem;

type LoopHandle = JoinHandle<Result<(), WorkerError>>;

pub struct PollingWorker {
    source: Arc<dyn TaskSource>,
    runner: Arc<dyn TaskRunner>,
    config: SchedulerConfig,
    running: Arc<AtomicBool>,
    active: Mutex<Option<(CancellationToken, LoopHandle)>>,
}

impl PollingWorker {
    pub fn new(
        source: Arc<dyn TaskSource>,
        runner: Arc<dyn TaskRunner>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            source,
            runner,
            config,
            running: Arc::new(AtomicBool::new(false)),
            active: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Spawns the loop on the current runtime.
    ///
    /// A loop that ended on its own still holds its result until [`PollingWorker::stop`] collects
    /// it, and the worker cannot be started again before that.
    pub fn start(&self) -> Result<(), WorkerError> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if active.is_some() {
            return Err(if self.is_running() {
                WorkerError::AlreadyRunning
            } else {
                WorkerError::NotCollected
            });
        }
        self.running.store(true, Ordering::SeqCst);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            self.source.clone(),
            self.runner.clone(),
            self.config.clone(),
            self.running.clone(),
            cancel.clone(),
        ));
        *active = Some((cancel, handle));
        info!(
            limit = self.config.limit,
            refresh_delay_ms = self.config.refresh_delay.as_millis() as u64,
            "Scheduler ready"
        );
        Ok(())
    }

    /// Signals the loop and waits until it has exited. Returns the error that ended the loop early,
    /// if any. Calling it on a stopped worker is a no-op.
    pub async fn stop(&self) -> Result<(), WorkerError> {
        self.running.store(false, Ordering::SeqCst);
        let active = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some((cancel, handle)) = active else {
            return Ok(());
        };

        cancel.cancel();
        let result = handle
            .await
            .map_err(|e| WorkerError::Join(e.to_string()))?;
        info!("Scheduler closed");
        result
    }
}

#[instrument(skip_all, fields(limit = config.limit))]
async fn run_loop(
    source: Arc<dyn TaskSource>,
    runner: Arc<dyn TaskRunner>,
    config: SchedulerConfig,
    running: Arc<AtomicBool>,
    cancel: CancellationToken,
) -> Result<(), WorkerError> {
    let result = poll(&*source, &*runner, &config, &running, &cancel).await;
    running.store(false, Ordering::SeqCst);
    if let Err(e) = &result {
        error!(error = %e, "Scheduler stopped on error");
    }
    result
}

async fn poll(
    source: &dyn TaskSource,
    runner: &dyn TaskRunner,
    config: &SchedulerConfig,
    running: &AtomicBool,
    cancel: &CancellationToken,
) -> Result<(), WorkerError> {
    while running.load(Ordering::SeqCst) {
        let items = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Scheduler cancelled");
                break;
            }
            items = source.get_planned(config.limit) => items?,
        };
        if !running.load(Ordering::SeqCst) {
            warn!("Scheduler cancelled");
            break;
        }

        if !items.is_empty() {
            process_batch(source, runner, &items).await?;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Scheduler cancelled");
                break;
            }
            _ = tokio::time::sleep(config.refresh_delay) => {}
        }
    }
    Ok(())
}

async fn process_batch(
    source: &dyn TaskSource,
    runner: &dyn TaskRunner,
    items: &[WorkItem],
) -> Result<(), WorkerError> {
    let ids: Vec<Uuid> = items.iter().map(|item| item.id).collect();
    let names: Vec<&str> = items.iter().map(|item| item.task.as_str()).collect();
    info!(count = items.len(), tasks = ?names, "New tasks in progress");

    source.mark_in_progress(&ids).await?;
    let outcomes = runner.run(items).await?;
    for outcome in &outcomes {
        source.save_outcome(outcome).await?;
    }

    info!(count = outcomes.len(), tasks = ?names, "Tasks successful");
    Ok(())
}
