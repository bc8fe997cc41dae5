//! Report commands: fixed periods relative to today, an arbitrary period typed as
//! `report 2024-01-01 2024-01-31`, and `/clear_db`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use command_dispatch::{handler_fn, Command, CommandHandler};
use loader_core::{CommandOutput, HandlerError};
use report_client::{period, ReportClient, ReportPeriod};
use tracing::info;

/// Full-text pattern for the arbitrary period report; the two dates become the handler arguments.
pub const REPORT_RULE: &str = r"report \d{4}-\d{2}-\d{2} \d{4}-\d{2}-\d{2}";

type PeriodFn = fn(NaiveDate) -> ReportPeriod;

/// Fetches the report for a period computed from today's date.
pub struct ReportCommand {
    client: Arc<ReportClient>,
    period: PeriodFn,
    today: fn() -> NaiveDate,
}

impl ReportCommand {
    pub fn new(client: Arc<ReportClient>, period: PeriodFn) -> Self {
        Self {
            client,
            period,
            today: local_today,
        }
    }

    /// Replaces the clock, for tests.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

#[async_trait]
impl CommandHandler for ReportCommand {
    async fn call(&self, _args: Vec<String>) -> Result<CommandOutput, HandlerError> {
        let period = (self.period)((self.today)());
        fetch(&self.client, &period).await
    }
}

/// Handles `report START END`.
pub struct PeriodReportHandler {
    client: Arc<ReportClient>,
}

impl PeriodReportHandler {
    pub fn new(client: Arc<ReportClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommandHandler for PeriodReportHandler {
    async fn call(&self, args: Vec<String>) -> Result<CommandOutput, HandlerError> {
        let [start, end] = args.as_slice() else {
            return Err(HandlerError::InvalidArguments(
                "Expected: report YYYY-MM-DD YYYY-MM-DD".to_string(),
            ));
        };
        let period = ReportPeriod::parse(start, end)?;
        fetch(&self.client, &period).await
    }
}

async fn fetch(client: &ReportClient, period: &ReportPeriod) -> Result<CommandOutput, HandlerError> {
    let bytes = client.fetch_report(period).await?;
    let name = period.file_name();
    info!(file = %name, size = bytes.len(), "Report ready");
    Ok(CommandOutput::File { name, bytes })
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn last_30_days(day: NaiveDate) -> ReportPeriod {
    period::last_days(day, 30)
}

/// The fixed-period report commands.
pub fn report_commands(client: Arc<ReportClient>) -> Vec<Command> {
    let table: [(&str, &str, PeriodFn); 6] = [
        ("report_today", "report for today", period::today),
        ("report_week", "report for the current week", period::current_week),
        ("report_month", "report for the current month", period::current_month),
        ("report_last_week", "report for the last week", period::last_week),
        ("report_last_month", "report for the last month", period::last_month),
        ("report_30_days", "report for the last 30 days", last_30_days),
    ];
    table
        .into_iter()
        .map(|(name, description, period)| {
            Command::new(
                name,
                description,
                Arc::new(ReportCommand::new(client.clone(), period)),
            )
        })
        .collect()
}

pub fn period_report_handler(client: Arc<ReportClient>) -> Arc<dyn CommandHandler> {
    Arc::new(PeriodReportHandler::new(client))
}

pub fn clear_db_command(client: Arc<ReportClient>) -> Command {
    Command::new(
        "clear_db",
        "clear the analytics database",
        handler_fn(move |_args| {
            let client = client.clone();
            async move {
                let status = client.clear_database().await?;
                Ok::<_, HandlerError>(CommandOutput::Text(status.to_string()))
            }
        }),
    )
}
