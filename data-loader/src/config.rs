//! Application config loaded from env. Every variable except the two tokens has a default.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use scheduler::SchedulerConfig;
use ya_disk::YaDiskConfig;

pub const DEFAULT_LANG_CODES: &str = "ru,en";
pub const DEFAULT_FILE_MAX_SIZE: usize = 10 * 1024 * 1024;
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8004;
pub const DEFAULT_REPORT_SERVICE_URL: &str = "http://localhost:8005";
pub const DEFAULT_DATABASE_URL: &str = "./data_loader.db";
pub const DEFAULT_LOG_FILE: &str = "logs/data-loader.log";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// BOT_TOKEN, or the `--token` CLI override. Only `run` needs it.
    pub bot_token: Option<String>,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// BOT_LANG_CODES: locales the command menu is published for
    pub lang_codes: Vec<String>,
    pub ya_disk: YaDiskConfig,
    /// FILE_MAX_SIZE in bytes, for the HTTP endpoint
    pub file_max_size: usize,
    pub http_host: String,
    pub http_port: u16,
    pub report_service_url: String,
    pub scheduler_enabled: bool,
    pub scheduler: SchedulerConfig,
    pub database_url: String,
    pub log_file: String,
}

impl AppConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = token.or_else(|| env::var("BOT_TOKEN").ok());
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let lang_codes = env::var("BOT_LANG_CODES")
            .unwrap_or_else(|_| DEFAULT_LANG_CODES.to_string())
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect();

        let ya_token = env::var("YA_TOKEN").context("YA_TOKEN not set")?;
        let mut ya_disk = YaDiskConfig::new(ya_token);
        if let Ok(dir) = env::var("YA_DIR") {
            ya_disk = ya_disk.with_dir(dir);
        }
        if let Ok(url) = env::var("YA_API_URL") {
            ya_disk = ya_disk.with_api_url(url);
        }
        if let Some(count) = parse_var::<u32>("YA_ATTEMPT_COUNT")? {
            ya_disk = ya_disk.with_attempt_count(count);
        }

        let scheduler = SchedulerConfig::new(
            parse_var("SCHEDULER_LIMIT")?.unwrap_or(scheduler::config::DEFAULT_LIMIT),
            parse_var::<u64>("SCHEDULER_REFRESH_DELAY_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(scheduler::config::DEFAULT_REFRESH_DELAY),
        );

        Ok(Self {
            bot_token,
            telegram_api_url,
            lang_codes,
            ya_disk,
            file_max_size: parse_var("FILE_MAX_SIZE")?.unwrap_or(DEFAULT_FILE_MAX_SIZE),
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| DEFAULT_HTTP_HOST.to_string()),
            http_port: parse_var("HTTP_PORT")?.unwrap_or(DEFAULT_HTTP_PORT),
            report_service_url: env::var("REPORT_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_REPORT_SERVICE_URL.to_string()),
            scheduler_enabled: parse_var("SCHEDULER_ENABLED")?.unwrap_or(false),
            scheduler,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string()),
        })
    }

    /// Validate config (URLs parse, counts are positive, at least one locale).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        if reqwest::Url::parse(&self.ya_disk.api_url).is_err() {
            anyhow::bail!("YA_API_URL is not a valid URL: {}", self.ya_disk.api_url);
        }
        if reqwest::Url::parse(&self.report_service_url).is_err() {
            anyhow::bail!("REPORT_SERVICE_URL is not a valid URL: {}", self.report_service_url);
        }
        if self.ya_disk.attempt_count == 0 {
            anyhow::bail!("YA_ATTEMPT_COUNT must be at least 1");
        }
        if self.lang_codes.is_empty() {
            anyhow::bail!("BOT_LANG_CODES must name at least one locale");
        }
        if self.file_max_size == 0 {
            anyhow::bail!("FILE_MAX_SIZE must be positive");
        }
        if self.scheduler_enabled && self.scheduler.limit == 0 {
            anyhow::bail!("SCHEDULER_LIMIT must be at least 1");
        }
        Ok(())
    }

    pub fn require_bot_token(&self) -> Result<&str> {
        self.bot_token
            .as_deref()
            .context("BOT_TOKEN not set (pass --token or set BOT_TOKEN)")
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{name} has an invalid value {raw:?}: {e}")),
        Err(_) => Ok(None),
    }
}
