//! Chat platform abstraction for replies and the command menu.
//!
//! [`ChatPlatform`] is transport-agnostic; the data-loader application implements it via teloxide.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CommandSpec, InboundEvent, OutgoingFile};

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Replies to the chat the event came from, optionally attaching a file.
    async fn reply(&self, event: &InboundEvent, text: &str, file: Option<OutgoingFile>)
        -> Result<()>;

    /// Replaces the whole command list shown for `lang_code`. The platform has no delta API.
    async fn set_commands(&self, commands: &[CommandSpec], lang_code: &str) -> Result<()>;
}
