//! Core types: sender, chat, inbound event, document attachment, handler output.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Chunked byte stream, e.g. a chat attachment being downloaded.
pub type ByteStream = BoxStream<'static, Result<Bytes, StorageError>>;

/// Sender identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

/// Chat (channel or private) identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

/// Re-openable source of a document's bytes. Each call to [`DocumentSource::open`] starts a fresh
/// download, so an upload retried after a failed transfer streams the content again.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn open(&self) -> Result<ByteStream, StorageError>;
}

/// A binary attachment carried by an inbound event.
#[derive(Clone)]
pub struct Document {
    pub mime_type: String,
    pub file_name: Option<String>,
    pub size_bytes: u64,
    pub source: Arc<dyn DocumentSource>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum EventKind {
    Text { raw: String },
    Document(Document),
}

/// A single incoming chat event. Lives only for the duration of one dispatch.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub id: String,
    pub sender: User,
    pub chat: Chat,
    pub kind: EventKind,
    pub received_at: DateTime<Utc>,
}

impl InboundEvent {
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Text { raw } => Some(raw),
            EventKind::Document(_) => None,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        match &self.kind {
            EventKind::Document(doc) => Some(doc),
            EventKind::Text { .. } => None,
        }
    }
}

/// What a command handler produced: a text reply, or a file to attach to the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Text(String),
    File { name: String, bytes: Bytes },
}

/// File attached to an outgoing reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingFile {
    pub name: String,
    pub bytes: Bytes,
}

/// Name/description pair as published in the platform's command menu (name without the `/` marker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub command: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    struct EmptySource;

    #[async_trait]
    impl DocumentSource for EmptySource {
        async fn open(&self) -> Result<ByteStream, StorageError> {
            Ok(Box::pin(stream::empty()))
        }
    }

    fn event(kind: EventKind) -> InboundEvent {
        InboundEvent {
            id: "1".to_string(),
            sender: User {
                id: 7,
                username: None,
            },
            chat: Chat {
                id: 7,
                chat_type: "private".to_string(),
            },
            kind,
            received_at: Utc::now(),
        }
    }

    #[test]
    fn test_text_event_accessors() {
        let ev = event(EventKind::Text {
            raw: "/start".to_string(),
        });
        assert_eq!(ev.text(), Some("/start"));
        assert!(ev.document().is_none());
    }

    #[test]
    fn test_document_event_accessors_and_debug() {
        let ev = event(EventKind::Document(Document {
            mime_type: "text/plain".to_string(),
            file_name: Some("a.txt".to_string()),
            size_bytes: 3,
            source: Arc::new(EmptySource),
        }));
        assert!(ev.text().is_none());
        let doc = ev.document().unwrap();
        assert_eq!(doc.size_bytes, 3);
        assert!(format!("{:?}", doc).contains("a.txt"));
    }
}
