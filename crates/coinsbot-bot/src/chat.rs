//! Outbound chat seam.
//!
//! The dispatcher only talks to [`ChatApi`]; [`crate::telegram::TelegramChat`]
//! is the production implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::messages::Keyboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// How a text message body is interpreted by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    /// Legacy Telegram Markdown (`*bold*`).
    Markdown,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageId, ChatError>;

    /// Sends the image at `photo_url` with `caption` underneath.
    async fn send_photo(
        &self,
        chat: ChatId,
        photo_url: &str,
        caption: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageId, ChatError>;

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), ChatError>;
}
