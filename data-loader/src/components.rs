//! Component factory: builds the storage pipeline, report client, task store, bot and dispatcher
//! from config. Isolates assembly logic from the runner.

use std::sync::Arc;

use anyhow::Result;
use command_dispatch::{CommandRegistry, EventDispatcher};
use loader_core::ChatPlatform;
use report_client::ReportClient;
use storage::TaskRepository;
use teloxide::prelude::*;
use tracing::{error, info, instrument};
use ya_disk::{UploadPipeline, YaDiskClient};

use crate::config::AppConfig;
use crate::handlers::{
    clear_db_command, period_report_handler, report_commands, start_command, DocumentLoader,
    REPORT_RULE,
};

/// Long-lived dependencies shared by the bot, the HTTP endpoint and the worker.
#[derive(Clone)]
pub struct AppComponents {
    pub pipeline: Arc<UploadPipeline>,
    pub reports: Arc<ReportClient>,
    /// Only when the scheduler is enabled.
    pub tasks: Option<Arc<TaskRepository>>,
}

/// Builds components. The pipeline is not connected yet; the runner calls `connect()`.
#[instrument(skip(config))]
pub async fn build_components(config: &AppConfig) -> Result<AppComponents> {
    let client = YaDiskClient::new(&config.ya_disk.api_url, &config.ya_disk.token)?;
    let pipeline = Arc::new(UploadPipeline::new(Arc::new(client), &config.ya_disk));
    let reports = Arc::new(ReportClient::new(&config.report_service_url)?);

    let tasks = if config.scheduler_enabled {
        let repo = TaskRepository::new(&config.database_url).await.map_err(|e| {
            error!(
                error = %e,
                database_url = %config.database_url,
                "Failed to initialize task storage"
            );
            anyhow::anyhow!("Failed to initialize task storage: {}", e)
        })?;
        Some(Arc::new(repo))
    } else {
        None
    };

    Ok(AppComponents {
        pipeline,
        reports,
        tasks,
    })
}

pub fn build_teloxide_bot(config: &AppConfig) -> Result<Bot> {
    let bot = Bot::new(config.require_bot_token()?);
    let bot = if let Some(ref url_str) = config.telegram_api_url {
        match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        }
    } else {
        bot
    };
    Ok(bot)
}

/// Registers every chat command, the period report rule and the document loader, pushing the
/// command menu to each locale in `lang_codes`.
#[instrument(skip(components, platform))]
pub async fn build_dispatcher(
    components: &AppComponents,
    platform: Arc<dyn ChatPlatform>,
    lang_codes: Vec<String>,
) -> Result<Arc<EventDispatcher>> {
    let registry = Arc::new(CommandRegistry::new(platform.clone(), lang_codes));

    let mut commands = vec![start_command()];
    commands.extend(report_commands(components.reports.clone()));
    commands.push(clear_db_command(components.reports.clone()));
    registry.add_commands(commands).await?;
    registry.add_regex_rule(REPORT_RULE, period_report_handler(components.reports.clone()))?;

    let loader = Arc::new(DocumentLoader::new(components.pipeline.clone()));
    let dispatcher = EventDispatcher::new(registry, platform).with_document_handler(loader);
    info!("Dispatcher ready");
    Ok(Arc::new(dispatcher))
}
