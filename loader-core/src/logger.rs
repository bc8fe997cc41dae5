//! Tracing setup for the data loader processes.
//!
//! The bot, the HTTP endpoint and the task worker all log through one subscriber. Every event goes
//! to stdout and is appended to the `LOG_FILE` configured for the process (`logs/data-loader.log`
//! by default), so upload retries, dispatch steps and worker cycles end up in one place.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber, writing to stdout and appending to `log_file_path`.
///
/// The parent directory must already exist; the runner creates it from `LOG_FILE`. Verbosity comes
/// from `RUST_LOG` (e.g. `ya_disk=debug,command_dispatch=debug`), so `.env` has to be loaded first.
/// A second call fails instead of replacing the installed subscriber.
pub fn init_tracing(log_file_path: &str) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("Failed to open log file {log_file_path}"))?;
    let file = Arc::new(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let writer = io::stdout.and(file);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}
