//! # Data loader application
//!
//! Telegram bot and HTTP endpoint that push spreadsheets to Yandex Disk and fetch reports from the
//! analytics service. Wires command-dispatch, ya-disk, report-client, scheduler and storage; loads
//! config from env and runs until Ctrl-C.

pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod http;
pub mod runner;
pub mod telegram;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_components, build_dispatcher, build_teloxide_bot, AppComponents};
pub use config::AppConfig;
pub use runner::{run_app, run_http};
