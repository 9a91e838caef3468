//! Telegram channel adapter.
//!
//! Drives the teloxide long-polling `Dispatcher` until the process exits.
//! No public URL required.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::info;

use crate::context::BotContext;
use crate::handler::handle_message;

/// Wraps the shared `Bot` and runs the event loop.
pub struct TelegramAdapter {
    bot: Bot,
    ctx: Arc<BotContext>,
}

impl TelegramAdapter {
    /// The `Bot` is constructed by the caller so the scheduler's notifier
    /// can share its connection pool.
    pub fn new(bot: Bot, ctx: Arc<BotContext>) -> Self {
        Self { bot, ctx }
    }

    /// Connect to Telegram and dispatch until shutdown (ctrl-c).
    pub async fn run(self) {
        info!("telegram: starting long-polling dispatcher");

        let handler = Update::filter_message().endpoint(handle_message);

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.ctx])
            .default_handler(|_upd| async {})
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}
