//! Shared state injected into the message handler.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;

use olxwatch_core::config::{PollConfig, TelegramConfig};
use olxwatch_core::{ListingSource, TrackedTermRegistry};
use olxwatch_scheduler::PollScheduler;

/// What the next plain-text message from a chat means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingInput {
    /// `/search` was issued; the next message is a one-shot search query.
    SearchQuery,
    /// "Add product to track" was pressed; the next message is a new term.
    NewTerm,
}

/// Dependencies of the Telegram handler path.
pub struct BotContext {
    pub registry: Arc<dyn TrackedTermRegistry>,
    pub scheduler: Arc<PollScheduler>,
    pub source: Arc<dyn ListingSource>,
    pub telegram: TelegramConfig,
    pub poll: PollConfig,
    /// Conversational state per chat id.
    pub pending: DashMap<i64, PendingInput>,
}

impl BotContext {
    pub fn new(
        registry: Arc<dyn TrackedTermRegistry>,
        scheduler: Arc<PollScheduler>,
        source: Arc<dyn ListingSource>,
        telegram: TelegramConfig,
        poll: PollConfig,
    ) -> Self {
        Self {
            registry,
            scheduler,
            source,
            telegram,
            poll,
            pending: DashMap::new(),
        }
    }

    /// The configured per-job poll period.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_minutes * 60)
    }
}
