//! Routes incoming chat messages and delivers pipeline results.
//!
//! Link messages are acknowledged with a status message and handed to the
//! worker pool; the caller gets control back immediately. The background job
//! always replaces the status message with either the product reply or a
//! localized error.

use std::sync::Arc;

use coinsbot_links::{extract_first_link, is_platform_link};

use crate::chat::{ChatApi, ChatError, ChatId, MessageId, TextFormat};
use crate::compose::ComposedMessage;
use crate::messages::{
    Keyboard, GENERIC_ERROR, NO_PRODUCT_ID, REJECT_NOT_PLATFORM_LINK, STATUS_PREPARING, WELCOME,
};
use crate::pipeline::{Pipeline, PipelineError};
use crate::pool::{TaskHandle, WorkerPool};

/// Transport-neutral inbound text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: ChatId,
    pub text: String,
}

/// How a background job ended, as seen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Reply sent as a photo with caption.
    Photo,
    /// Reply sent as text (no image, or the photo send failed).
    Text,
    NoProductId,
    /// Pipeline failed; the generic error message was sent.
    Failed,
    /// The final message could not be sent at all.
    Undelivered,
}

/// What [`MessageDispatcher::handle`] did with a message.
#[derive(Debug)]
pub enum Dispatched {
    Welcome,
    Rejected,
    Submitted(TaskHandle<DeliveryOutcome>),
}

pub struct MessageDispatcher {
    chat: Arc<dyn ChatApi>,
    pipeline: Arc<Pipeline>,
    pool: WorkerPool,
}

impl MessageDispatcher {
    #[must_use]
    pub fn new(chat: Arc<dyn ChatApi>, pipeline: Arc<Pipeline>, pool: WorkerPool) -> Self {
        Self {
            chat,
            pipeline,
            pool,
        }
    }

    /// Handles one message.
    ///
    /// # Errors
    ///
    /// Returns the [`ChatError`] if the synchronous reply (welcome, rejection
    /// or status message) cannot be sent. Background failures are never
    /// surfaced here.
    pub async fn handle(&self, message: IncomingMessage) -> Result<Dispatched, ChatError> {
        let chat_id = message.chat_id;

        if is_start_command(&message.text) {
            self.chat
                .send_text(chat_id, WELCOME, TextFormat::Markdown, Some(Keyboard::Start))
                .await?;
            tracing::debug!(chat_id = chat_id.0, "sent welcome");
            return Ok(Dispatched::Welcome);
        }

        let Some(link) = extract_first_link(&message.text).filter(|l| is_platform_link(l)) else {
            self.chat
                .send_text(chat_id, REJECT_NOT_PLATFORM_LINK, TextFormat::Plain, None)
                .await?;
            return Ok(Dispatched::Rejected);
        };

        let status = self
            .chat
            .send_text(chat_id, STATUS_PREPARING, TextFormat::Plain, None)
            .await?;

        tracing::info!(chat_id = chat_id.0, link, "link submitted for processing");
        let handle = self.pool.submit(deliver(
            Arc::clone(&self.chat),
            Arc::clone(&self.pipeline),
            chat_id,
            status,
            link.to_owned(),
        ));
        Ok(Dispatched::Submitted(handle))
    }
}

/// `/start`, `/start@botname`, with or without a payload.
fn is_start_command(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|cmd| cmd == "/start" || cmd.starts_with("/start@"))
}

async fn deliver(
    chat: Arc<dyn ChatApi>,
    pipeline: Arc<Pipeline>,
    chat_id: ChatId,
    status: MessageId,
    link: String,
) -> DeliveryOutcome {
    match pipeline.run(&link).await {
        Ok(message) => {
            discard_status(chat.as_ref(), chat_id, status).await;
            send_reply(chat.as_ref(), chat_id, &message).await
        }
        Err(PipelineError::NoProductId { link }) => {
            tracing::info!(chat_id = chat_id.0, link = %link, "no product id in link");
            let sent = chat
                .send_text(chat_id, NO_PRODUCT_ID, TextFormat::Plain, None)
                .await;
            discard_status(chat.as_ref(), chat_id, status).await;
            match sent {
                Ok(_) => DeliveryOutcome::NoProductId,
                Err(e) => {
                    tracing::error!(chat_id = chat_id.0, error = %e, "failed to send reply");
                    DeliveryOutcome::Undelivered
                }
            }
        }
        Err(e) => {
            tracing::error!(chat_id = chat_id.0, link = %link, error = %e, "link processing failed");
            discard_status(chat.as_ref(), chat_id, status).await;
            match chat
                .send_text(chat_id, GENERIC_ERROR, TextFormat::Plain, None)
                .await
            {
                Ok(_) => DeliveryOutcome::Failed,
                Err(e) => {
                    tracing::error!(chat_id = chat_id.0, error = %e, "failed to send error reply");
                    DeliveryOutcome::Undelivered
                }
            }
        }
    }
}

async fn discard_status(chat: &dyn ChatApi, chat_id: ChatId, status: MessageId) {
    if let Err(e) = chat.delete_message(chat_id, status).await {
        tracing::debug!(chat_id = chat_id.0, error = %e, "could not delete status message");
    }
}

async fn send_reply(chat: &dyn ChatApi, chat_id: ChatId, message: &ComposedMessage) -> DeliveryOutcome {
    if let Some(image_url) = &message.image_url {
        match chat
            .send_photo(chat_id, image_url, &message.text, Some(Keyboard::Reply))
            .await
        {
            Ok(_) => return DeliveryOutcome::Photo,
            Err(e) => {
                tracing::warn!(chat_id = chat_id.0, error = %e, "photo reply failed, sending as text");
            }
        }
    }

    match chat
        .send_text(chat_id, &message.text, TextFormat::Plain, Some(Keyboard::Reply))
        .await
    {
        Ok(_) => DeliveryOutcome::Text,
        Err(e) => {
            tracing::error!(chat_id = chat_id.0, error = %e, "failed to send reply");
            DeliveryOutcome::Undelivered
        }
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
pub(crate) mod tests;
