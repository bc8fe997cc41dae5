//! Telegram framework layer: message adapters, attachment download, reply platform, REPL runner.

mod adapters;
mod platform;
mod runner;
mod source;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use platform::TelegramPlatform;
pub use runner::{dispatch_event, run_repl};
pub use source::TelegramDocumentSource;
