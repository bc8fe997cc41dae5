//! [`ChatPlatform`] over teloxide: replies (optionally with a document) and the command menu.

use async_trait::async_trait;
use loader_core::{ChatPlatform, CommandSpec, DispatchError, InboundEvent, OutgoingFile, Result};
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatId, InputFile, MessageId, ReplyParameters};
use teloxide::RequestError;

pub struct TelegramPlatform {
    bot: Bot,
}

impl TelegramPlatform {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &Bot {
        &self.bot
    }
}

fn bot_error(e: RequestError) -> DispatchError {
    DispatchError::Bot(e.to_string())
}

#[async_trait]
impl ChatPlatform for TelegramPlatform {
    async fn reply(
        &self,
        event: &InboundEvent,
        text: &str,
        file: Option<OutgoingFile>,
    ) -> Result<()> {
        let chat_id = ChatId(event.chat.id);
        let reply_to = event
            .id
            .parse::<i32>()
            .ok()
            .map(|id| ReplyParameters::new(MessageId(id)));

        match file {
            Some(file) => {
                let document = InputFile::memory(file.bytes.to_vec()).file_name(file.name);
                let mut request = self.bot.send_document(chat_id, document).caption(text);
                if let Some(params) = reply_to {
                    request = request.reply_parameters(params);
                }
                request.await.map_err(bot_error)?;
            }
            None => {
                let mut request = self.bot.send_message(chat_id, text);
                if let Some(params) = reply_to {
                    request = request.reply_parameters(params);
                }
                request.await.map_err(bot_error)?;
            }
        }
        Ok(())
    }

    async fn set_commands(&self, commands: &[CommandSpec], lang_code: &str) -> Result<()> {
        let commands: Vec<BotCommand> = commands
            .iter()
            .map(|c| BotCommand::new(c.command.clone(), c.description.clone()))
            .collect();
        self.bot
            .set_my_commands(commands)
            .language_code(lang_code)
            .await
            .map_err(bot_error)?;
        Ok(())
    }
}
