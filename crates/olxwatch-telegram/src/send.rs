//! Plain-text sending helpers.
//!
//! Telegram caps messages at 4096 characters; longer texts (a search-result
//! page with long titles) are split on line boundaries at 4090. A short
//! delay between consecutive chunks avoids per-chat rate limits.

use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::KeyboardMarkup;
use tracing::warn;

/// Maximum characters per message (limit is 4096; 4090 for safety).
const CHUNK_MAX: usize = 4090;

/// Split `text` into chunks of at most `CHUNK_MAX` bytes, preferring line
/// boundaries, then spaces, then a character-boundary hard cut.
pub fn split_chunks(text: &str) -> Vec<String> {
    if text.len() <= CHUNK_MAX {
        return vec![text.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in text.split('\n') {
        let cost = if current.is_empty() {
            line.len()
        } else {
            1 + line.len()
        };
        if !current.is_empty() && current.len() + cost > CHUNK_MAX {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    // A single line longer than the cap still needs a hard split. Cuts are
    // nudged back onto char boundaries; titles here are mostly Cyrillic.
    let mut result = Vec::new();
    for chunk in chunks {
        if chunk.len() <= CHUNK_MAX {
            result.push(chunk);
            continue;
        }
        let mut remaining = chunk.as_str();
        while remaining.len() > CHUNK_MAX {
            let mut cut = CHUNK_MAX;
            while !remaining.is_char_boundary(cut) {
                cut -= 1;
            }
            let split_at = remaining[..cut]
                .rfind('\n')
                .or_else(|| remaining[..cut].rfind(' '))
                .unwrap_or(cut);
            result.push(remaining[..split_at].to_string());
            remaining = remaining[split_at..].trim_start();
        }
        if !remaining.is_empty() {
            result.push(remaining.to_string());
        }
    }
    result
}

/// Send `text` to `chat_id`, chunked.
///
/// Delivery failures are logged, not propagated: a reply that cannot be
/// sent should not fail the handler.
pub async fn send_text(bot: &Bot, chat_id: ChatId, text: &str) {
    let chunks = split_chunks(text);
    let last = chunks.len().saturating_sub(1);
    for (i, chunk) in chunks.iter().enumerate() {
        if let Err(e) = bot.send_message(chat_id, chunk).await {
            warn!(error = %e, chunk_index = i, "failed to send message");
        }
        if i < last {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

/// Same as [`send_text`] with a reply keyboard attached to the final chunk.
pub async fn send_with_keyboard(bot: &Bot, chat_id: ChatId, text: &str, markup: KeyboardMarkup) {
    let chunks = split_chunks(text);
    let last = chunks.len().saturating_sub(1);
    for (i, chunk) in chunks.iter().enumerate() {
        let sent = if i == last {
            bot.send_message(chat_id, chunk)
                .reply_markup(markup.clone())
                .await
        } else {
            bot.send_message(chat_id, chunk).await
        };
        if let Err(e) = sent {
            warn!(error = %e, chunk_index = i, "failed to send message");
        }
        if i < last {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}
