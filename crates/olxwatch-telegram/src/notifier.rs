//! Scheduler-facing notifier backed by the shared teloxide `Bot`.

use async_trait::async_trait;
use teloxide::prelude::*;

use olxwatch_core::{DeliveryError, Notifier, UserId};

/// Sends poll notifications to Telegram chats.
///
/// Recipients are the decimal chat ids carried in [`UserId`]; a value that
/// does not parse is a per-call delivery failure, never a panic.
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, recipient: &UserId, message: &str) -> Result<(), DeliveryError> {
        let chat_id: i64 = recipient
            .as_str()
            .parse()
            .map_err(|_| DeliveryError::BadRecipient(recipient.to_string()))?;

        self.bot
            .send_message(ChatId(chat_id), message)
            .await
            .map_err(|e| DeliveryError::Send(e.to_string()))?;
        Ok(())
    }
}
