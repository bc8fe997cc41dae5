//! Event dispatcher: classify → handle → reply, one event at a time, no lock across events.

use std::sync::Arc;

use loader_core::{
    ChatPlatform, CommandOutput, DispatchError, Document, EventKind, HandlerError, InboundEvent,
    OutgoingFile, Result, StorageError,
};
use tracing::{debug, info, instrument, warn};

use crate::handler::{CommandHandler, DocumentHandler};
use crate::registry::CommandRegistry;

pub const UNKNOWN_COMMAND_MSG: &str = "Unknown command or document.";
pub const SUCCESS_MSG: &str = "Command executed successfully.";
pub const ERROR_MSG: &str = "Something went wrong. Please try again later.";
pub const DOC_INVALID_MSG: &str = "Invalid file format, expected an excel file.";
pub const FAILURE_MSG: &str = "Failed to process the request.";
pub const RENAME_MSG: &str = "Please rename your file and try again.";
pub const TOKEN_INVALID_MSG: &str = "Access to the file storage was denied, the storage token must be updated.";

/// Reply produced for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub file: Option<OutgoingFile>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file: None,
        }
    }
}

pub struct EventDispatcher {
    registry: Arc<CommandRegistry>,
    platform: Arc<dyn ChatPlatform>,
    document_handler: Option<Arc<dyn DocumentHandler>>,
}

impl EventDispatcher {
    pub fn new(registry: Arc<CommandRegistry>, platform: Arc<dyn ChatPlatform>) -> Self {
        Self {
            registry,
            platform,
            document_handler: None,
        }
    }

    pub fn with_document_handler(mut self, handler: Arc<dyn DocumentHandler>) -> Self {
        self.document_handler = Some(handler);
        self
    }

    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Handles `event` and sends the reply.
    ///
    /// Connectivity failures of the handler become [`ERROR_MSG`]; any other handler error is
    /// returned for the caller to report (see [`failure_reply`]).
    #[instrument(skip(self, event), fields(event_id = %event.id, user_id = event.sender.id))]
    pub async fn dispatch(&self, event: &InboundEvent) -> Result<Reply> {
        let reply = self.handle(event).await?;
        debug!(text_len = reply.text.len(), has_file = reply.file.is_some(), "step: replying");
        self.platform
            .reply(event, &reply.text, reply.file.clone())
            .await?;
        Ok(reply)
    }

    /// Classifies and handles `event` without replying.
    pub async fn handle(&self, event: &InboundEvent) -> Result<Reply> {
        debug!(event_id = %event.id, "step: classifying");
        match &event.kind {
            EventKind::Document(document) => self.handle_document(document).await,
            EventKind::Text { raw } => self.handle_text(raw).await,
        }
    }

    async fn handle_document(&self, document: &Document) -> Result<Reply> {
        let Some(handler) = &self.document_handler else {
            info!(mime_type = %document.mime_type, "No document handler registered");
            return Ok(Reply::text(UNKNOWN_COMMAND_MSG));
        };
        if document.mime_type != handler.accepted_mime_type() {
            info!(
                mime_type = %document.mime_type,
                file_name = ?document.file_name,
                "Rejected document with unsupported type"
            );
            return Ok(Reply::text(DOC_INVALID_MSG));
        }

        debug!(file_name = ?document.file_name, "step: handling document");
        into_reply(handler.handle(document).await)
    }

    async fn handle_text(&self, raw: &str) -> Result<Reply> {
        let mut tokens = raw.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(Reply::text(UNKNOWN_COMMAND_MSG));
        };

        let handler: Option<Arc<dyn CommandHandler>> = self
            .registry
            .lookup(first)
            .or_else(|| self.registry.match_regex(raw));
        let Some(handler) = handler else {
            info!(command = %first, "Unknown command");
            return Ok(Reply::text(UNKNOWN_COMMAND_MSG));
        };

        let args: Vec<String> = tokens.map(str::to_owned).collect();
        debug!(command = %first, args = ?args, "step: handling command");
        into_reply(handler.call(args).await)
    }
}

fn into_reply(result: std::result::Result<CommandOutput, HandlerError>) -> Result<Reply> {
    match result {
        Ok(CommandOutput::Text(text)) => Ok(Reply::text(text)),
        Ok(CommandOutput::File { name, bytes }) => Ok(Reply {
            text: SUCCESS_MSG.to_string(),
            file: Some(OutgoingFile { name, bytes }),
        }),
        Err(e) if e.is_connectivity() => {
            warn!(error = %e, "Handler could not reach a remote service");
            Ok(Reply::text(ERROR_MSG))
        }
        Err(e) => Err(e.into()),
    }
}

/// Reply text for a dispatch that failed past the dispatcher's own boundary.
pub fn failure_reply(err: &DispatchError) -> String {
    match err {
        DispatchError::Handler(HandlerError::Storage(StorageError::Exhausted { .. })) => {
            RENAME_MSG.to_string()
        }
        DispatchError::Handler(HandlerError::Storage(StorageError::TokenInvalid)) => {
            TOKEN_INVALID_MSG.to_string()
        }
        DispatchError::Handler(HandlerError::InvalidArguments(msg)) => msg.clone(),
        _ => FAILURE_MSG.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reply_for_exhausted_upload_asks_to_rename() {
        let err = DispatchError::from(HandlerError::from(StorageError::Exhausted {
            name: "a.xlsx".into(),
            attempts: 10,
        }));
        assert_eq!(failure_reply(&err), RENAME_MSG);
    }

    #[test]
    fn test_failure_reply_passes_argument_errors_through() {
        let err = DispatchError::from(HandlerError::InvalidArguments("Invalid date: 2024-13-01".into()));
        assert_eq!(failure_reply(&err), "Invalid date: 2024-13-01");
    }

    #[test]
    fn test_failure_reply_reports_rejected_storage_token() {
        let err = DispatchError::from(HandlerError::from(StorageError::TokenInvalid));
        assert_eq!(failure_reply(&err), TOKEN_INVALID_MSG);
    }

    #[test]
    fn test_failure_reply_is_generic_otherwise() {
        assert_eq!(failure_reply(&DispatchError::Bot("timeout".into())), FAILURE_MSG);
    }

    #[test]
    fn test_connectivity_errors_become_try_again_reply() {
        let reply = into_reply(Err(HandlerError::Connectivity("refused".into()))).unwrap();
        assert_eq!(reply, Reply::text(ERROR_MSG));
    }

    #[test]
    fn test_file_output_becomes_success_with_attachment() {
        let reply = into_reply(Ok(CommandOutput::File {
            name: "r.xlsx".into(),
            bytes: bytes::Bytes::from_static(b"x"),
        }))
        .unwrap();
        assert_eq!(reply.text, SUCCESS_MSG);
        assert_eq!(reply.file.unwrap().name, "r.xlsx");
    }
}
