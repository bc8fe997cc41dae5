//! REPL runner: converts teloxide messages to inbound events and dispatches each one in its own task.

use std::sync::Arc;

use anyhow::Result;
use command_dispatch::{failure_reply, EventDispatcher};
use loader_core::{ChatPlatform, InboundEvent};
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;

/// Starts the REPL. Returns when teloxide stops polling (Ctrl-C).
#[instrument(skip_all)]
pub async fn run_repl(
    bot: Bot,
    dispatcher: Arc<EventDispatcher>,
    platform: Arc<dyn ChatPlatform>,
) -> Result<()> {
    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let dispatcher = dispatcher.clone();
        let platform = platform.clone();

        async move {
            let Some(event) = TelegramMessageWrapper(&msg).to_event(&bot) else {
                info!(chat_id = msg.chat.id.0, "Ignoring message without text or document");
                return Ok(());
            };

            // Dispatch in a spawned task so the REPL returns immediately
            tokio::spawn(async move {
                dispatch_event(&dispatcher, platform.as_ref(), &event).await;
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}

/// Dispatches one event; a failure that escaped the dispatcher is answered with a generic reply.
pub async fn dispatch_event(
    dispatcher: &EventDispatcher,
    platform: &dyn ChatPlatform,
    event: &InboundEvent,
) {
    info!(
        user_id = event.sender.id,
        chat_id = event.chat.id,
        message_id = %event.id,
        "step: processing message"
    );
    if let Err(e) = dispatcher.dispatch(event).await {
        error!(error = %e, user_id = event.sender.id, "Dispatch failed");
        let text = failure_reply(&e);
        if let Err(e) = platform.reply(event, &text, None).await {
            error!(error = %e, chat_id = event.chat.id, "Failed to send failure reply");
        }
    }
}
