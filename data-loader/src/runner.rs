//! Process lifecycle: logging, storage connect, bot + HTTP endpoint + optional worker, shutdown.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use loader_core::{init_tracing, ChatPlatform};
use scheduler::{CompleteAllRunner, PollingWorker};
use tracing::{error, info, instrument, warn};

use crate::components::{build_components, build_dispatcher, build_teloxide_bot, AppComponents};
use crate::config::AppConfig;
use crate::http::{self, HttpState};
use crate::telegram::{run_repl, TelegramPlatform};

/// Main entry for `run`: the Telegram bot, the HTTP endpoint and, when enabled, the task worker.
/// Returns after the REPL stops (Ctrl-C) and every component has been shut down.
#[instrument(skip(config))]
pub async fn run_app(config: AppConfig) -> Result<()> {
    config.validate()?;
    config.require_bot_token()?;
    prepare_logging(&config)?;

    info!(
        ya_dir = %config.ya_disk.dir,
        report_service_url = %config.report_service_url,
        scheduler_enabled = config.scheduler_enabled,
        "Initializing data loader"
    );

    let components = build_components(&config).await?;
    components
        .pipeline
        .connect()
        .await
        .context("Failed to connect to Yandex Disk")?;

    let result = run_connected(&config, &components).await;
    components.pipeline.disconnect().await;
    result
}

async fn run_connected(config: &AppConfig, components: &AppComponents) -> Result<()> {
    let bot = build_teloxide_bot(config)?;
    let platform: Arc<dyn ChatPlatform> = Arc::new(TelegramPlatform::new(bot.clone()));
    let dispatcher =
        build_dispatcher(components, platform.clone(), config.lang_codes.clone()).await?;

    let worker = match &components.tasks {
        Some(tasks) => {
            let worker = PollingWorker::new(
                tasks.clone(),
                Arc::new(CompleteAllRunner),
                config.scheduler.clone(),
            );
            worker.start()?;
            Some(worker)
        }
        None => None,
    };

    let state = HttpState {
        pipeline: components.pipeline.clone(),
        max_file_size: config.file_max_size,
    };
    let addr = http_addr(config)?;
    let http_task = tokio::spawn(async move {
        if let Err(e) = http::serve(addr, state, std::future::pending()).await {
            error!(error = %e, "HTTP endpoint failed");
        }
    });

    info!("Bot started successfully");
    let result = run_repl(bot, dispatcher, platform).await;

    info!("Shutting down");
    http_task.abort();
    if let Some(worker) = worker {
        if let Err(e) = worker.stop().await {
            warn!(error = %e, "Worker stopped with error");
        }
    }
    result
}

/// Main entry for `serve-http`: only the upload endpoint, until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_http(config: AppConfig) -> Result<()> {
    config.validate()?;
    prepare_logging(&config)?;

    let components = build_components(&config).await?;
    components
        .pipeline
        .connect()
        .await
        .context("Failed to connect to Yandex Disk")?;

    let state = HttpState {
        pipeline: components.pipeline.clone(),
        max_file_size: config.file_max_size,
    };
    let result = http::serve(http_addr(&config)?, state, shutdown_signal()).await;
    components.pipeline.disconnect().await;
    result
}

fn prepare_logging(config: &AppConfig) -> Result<()> {
    if let Some(dir) = Path::new(&config.log_file).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        }
    }
    init_tracing(&config.log_file)
}

fn http_addr(config: &AppConfig) -> Result<SocketAddr> {
    config
        .http_addr()
        .parse()
        .with_context(|| format!("Invalid HTTP_HOST/HTTP_PORT: {}", config.http_addr()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
    }
    info!("Shutdown signal received");
}
