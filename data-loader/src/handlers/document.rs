//! Document loader: streams an accepted spreadsheet from the chat to Yandex Disk.

use std::sync::Arc;

use async_trait::async_trait;
use command_dispatch::DocumentHandler;
use loader_core::{CommandOutput, Document, HandlerError};
use tracing::info;
use ya_disk::{UploadPipeline, UploadSource};

pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DOC_SUCCESS_MSG: &str = "Document successfully added to the queue for database insertion.";
const DEFAULT_FILE_NAME: &str = "document.xlsx";

pub struct DocumentLoader {
    pipeline: Arc<UploadPipeline>,
}

impl DocumentLoader {
    pub fn new(pipeline: Arc<UploadPipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl DocumentHandler for DocumentLoader {
    fn accepted_mime_type(&self) -> &str {
        XLSX_MIME_TYPE
    }

    async fn handle(&self, document: &Document) -> Result<CommandOutput, HandlerError> {
        let name = document.file_name.as_deref().unwrap_or(DEFAULT_FILE_NAME);
        let path = self
            .pipeline
            .upload(&UploadSource::Stream(document.source.clone()), name)
            .await?;
        info!(
            file = %name,
            path = %path,
            size_mb = document.size_bytes as f64 / 1024.0 / 1024.0,
            "Document queued"
        );
        Ok(CommandOutput::Text(DOC_SUCCESS_MSG.to_string()))
    }
}
