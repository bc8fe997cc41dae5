//! Chat attachment as a re-openable byte stream.

use async_trait::async_trait;
use futures::StreamExt;
use loader_core::{ByteStream, DocumentSource, StorageError};
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tracing::debug;

/// Resolves the file path with `getFile` on every open, then streams the download chunk by chunk.
pub struct TelegramDocumentSource {
    bot: Bot,
    file_id: FileId,
}

impl TelegramDocumentSource {
    pub fn new(bot: Bot, file_id: FileId) -> Self {
        Self { bot, file_id }
    }
}

#[async_trait]
impl DocumentSource for TelegramDocumentSource {
    async fn open(&self) -> Result<ByteStream, StorageError> {
        let file = self
            .bot
            .get_file(self.file_id.clone())
            .await
            .map_err(|e| StorageError::Transport(e.to_string()))?;
        debug!(path = %file.path, size = file.meta.size, "Downloading attachment");

        let chunks = self
            .bot
            .download_file_stream(&file.path)
            .map(|chunk| chunk.map_err(|e| StorageError::Transport(e.to_string())));
        Ok(chunks.boxed())
    }
}
