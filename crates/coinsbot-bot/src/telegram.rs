//! [`ChatApi`] over the Telegram Bot API via teloxide.

use async_trait::async_trait;
use reqwest::Url;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode};

use crate::chat::{ChatApi, ChatError, ChatId, MessageId, TextFormat};
use crate::messages::{ButtonAction, Keyboard};

pub struct TelegramChat {
    bot: Bot,
}

impl TelegramChat {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn parse_url(raw: &str) -> Result<Url, ChatError> {
    Url::parse(raw).map_err(|e| ChatError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

/// One button per row, matching the keyboard's declared order.
fn inline_markup(keyboard: Keyboard) -> Result<InlineKeyboardMarkup, ChatError> {
    let rows = keyboard
        .buttons()
        .into_iter()
        .map(|button| {
            let tg_button = match button.action {
                ButtonAction::Url(url) => InlineKeyboardButton::url(button.label, parse_url(url)?),
                ButtonAction::ShareInline => {
                    InlineKeyboardButton::switch_inline_query(button.label, "")
                }
            };
            Ok(vec![tg_button])
        })
        .collect::<Result<Vec<_>, ChatError>>()?;
    Ok(InlineKeyboardMarkup::new(rows))
}

#[async_trait]
impl ChatApi for TelegramChat {
    async fn send_text(
        &self,
        chat: ChatId,
        text: &str,
        format: TextFormat,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageId, ChatError> {
        let mut request = self.bot.send_message(teloxide::types::ChatId(chat.0), text);
        if format == TextFormat::Markdown {
            // The welcome text uses legacy `*bold*` syntax without V2 escaping.
            #[allow(deprecated)]
            {
                request = request.parse_mode(ParseMode::Markdown);
            }
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(inline_markup(keyboard)?);
        }
        let sent = request.await?;
        Ok(MessageId(sent.id.0))
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        photo_url: &str,
        caption: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageId, ChatError> {
        let photo = InputFile::url(parse_url(photo_url)?);
        let mut request = self
            .bot
            .send_photo(teloxide::types::ChatId(chat.0), photo)
            .caption(caption);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(inline_markup(keyboard)?);
        }
        let sent = request.await?;
        Ok(MessageId(sent.id.0))
    }

    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<(), ChatError> {
        self.bot
            .delete_message(
                teloxide::types::ChatId(chat.0),
                teloxide::types::MessageId(message.0),
            )
            .await?;
        Ok(())
    }
}
