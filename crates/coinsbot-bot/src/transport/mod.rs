//! Inbound update delivery: long polling or an HTTP webhook.

pub mod polling;
pub mod webhook;

use teloxide::types::{Message, Update, UpdateKind};

use crate::chat::ChatId;
use crate::dispatch::IncomingMessage;

/// Text messages only; other content is ignored.
pub(crate) fn incoming_from_message(message: &Message) -> Option<IncomingMessage> {
    message.text().map(|text| IncomingMessage {
        chat_id: ChatId(message.chat.id.0),
        text: text.to_owned(),
    })
}

pub(crate) fn incoming_from_update(update: &Update) -> Option<IncomingMessage> {
    match &update.kind {
        UpdateKind::Message(message) => incoming_from_message(message),
        _ => None,
    }
}
