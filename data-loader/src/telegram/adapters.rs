//! Converts teloxide messages into [`InboundEvent`]s.

use std::sync::Arc;

use loader_core::{Chat, Document, EventKind, InboundEvent, User};

use super::source::TelegramDocumentSource;

/// Telegram user to core user.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl TelegramUserWrapper<'_> {
    pub fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
        }
    }
}

/// Telegram message to inbound event.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl TelegramMessageWrapper<'_> {
    pub fn sender(&self) -> User {
        self.0
            .from
            .as_ref()
            .map(|u| TelegramUserWrapper(u).to_core())
            .unwrap_or(User {
                id: 0,
                username: None,
            })
    }

    pub fn chat(&self) -> Chat {
        Chat {
            id: self.0.chat.id.0,
            chat_type: format!("{:?}", self.0.chat.kind),
        }
    }

    /// `None` for messages that carry neither text nor a document (stickers, photos, service messages).
    pub fn to_event(&self, bot: &teloxide::Bot) -> Option<InboundEvent> {
        let kind = if let Some(doc) = self.0.document() {
            EventKind::Document(Document {
                mime_type: doc
                    .mime_type
                    .as_ref()
                    .map(|m| m.essence_str().to_string())
                    .unwrap_or_default(),
                file_name: doc.file_name.clone(),
                size_bytes: u64::from(doc.file.size),
                source: Arc::new(TelegramDocumentSource::new(bot.clone(), doc.file.id.clone())),
            })
        } else if let Some(text) = self.0.text() {
            EventKind::Text {
                raw: text.to_string(),
            }
        } else {
            return None;
        };

        Some(InboundEvent {
            id: self.0.id.to_string(),
            sender: self.sender(),
            chat: self.chat(),
            kind,
            received_at: self.0.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
    }
}
