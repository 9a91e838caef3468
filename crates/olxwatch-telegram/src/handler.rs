//! Message handler registered in the teloxide Dispatcher.
//!
//! One endpoint serves both slash commands and the keyboard-driven
//! conversation: `/search` and the add-term flow each arm a pending-input
//! marker for the chat, and the next plain message consumes it.

use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{info, warn};

use olxwatch_core::{RegistryError, UserId};
use olxwatch_scheduler::JobId;

use crate::allow;
use crate::context::{BotContext, PendingInput};
use crate::keyboard;
use crate::send;

/// Interactive `/search` replies show at most this many offers.
const SEARCH_PREVIEW_MAX: usize = 10;

pub async fn handle_message(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    // Ignore messages from other bots.
    if msg.from.as_ref().map(|u| u.is_bot).unwrap_or(false) {
        return Ok(());
    }
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let username = from.username.as_deref().unwrap_or("");
    let telegram_user_id = from.id.0.to_string();

    if !allow::is_allowed(&ctx.telegram.allow_users, username, &telegram_user_id) {
        send::send_text(&bot, msg.chat.id, "Sorry, you are not authorized.").await;
        return Ok(());
    }

    let Some(text) = msg.text() else {
        return Ok(());
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }

    let user = UserId::from(from.id.0);
    let chat_id = msg.chat.id;

    match text {
        "/start" => {
            ctx.pending.remove(&chat_id.0);
            send::send_with_keyboard(
                &bot,
                chat_id,
                "Welcome! Please choose an option:",
                keyboard::main_menu(),
            )
            .await;
        }
        "/search" => {
            ctx.pending.insert(chat_id.0, PendingInput::SearchQuery);
            send::send_text(
                &bot,
                chat_id,
                "Please enter the product name you want to search for:",
            )
            .await;
        }
        "/tracking" => {
            ctx.pending.remove(&chat_id.0);
            show_tracking_menu(&bot, chat_id, &ctx, &user).await;
        }
        _ => handle_text(&bot, chat_id, &ctx, &user, text).await,
    }

    Ok(())
}

/// Plain (non-command) text: consume any pending input first, then treat the
/// text as a keyboard button press.
async fn handle_text(bot: &Bot, chat_id: ChatId, ctx: &Arc<BotContext>, user: &UserId, text: &str) {
    match ctx.pending.remove(&chat_id.0).map(|(_, p)| p) {
        Some(PendingInput::SearchQuery) => {
            run_search(bot, chat_id, ctx, text).await;
            return;
        }
        Some(PendingInput::NewTerm) => {
            add_term(bot, chat_id, ctx, user, text).await;
            return;
        }
        None => {}
    }

    match text {
        keyboard::ADD_BUTTON => {
            let tracked = match ctx.registry.list_terms(user) {
                Ok(tracked) => tracked,
                Err(e) => {
                    report_registry_error(bot, chat_id, &e).await;
                    return;
                }
            };
            if tracked.len() >= ctx.poll.tracking_limit {
                send::send_text(
                    bot,
                    chat_id,
                    &format!(
                        "You already track {} products. Remove one before adding another.",
                        tracked.len()
                    ),
                )
                .await;
                return;
            }
            ctx.pending.insert(chat_id.0, PendingInput::NewTerm);
            send::send_text(bot, chat_id, "Type product name:").await;
        }
        keyboard::BACK_BUTTON => {
            send::send_with_keyboard(
                bot,
                chat_id,
                "Main menu. Choose an option:",
                keyboard::main_menu(),
            )
            .await;
        }
        _ => {
            // A tracked term's button press removes that term.
            let tracked = match ctx.registry.list_terms(user) {
                Ok(tracked) => tracked,
                Err(e) => {
                    report_registry_error(bot, chat_id, &e).await;
                    return;
                }
            };
            if tracked.iter().any(|t| t == text) {
                remove_term(bot, chat_id, ctx, user, text).await;
            } else {
                send::send_text(bot, chat_id, "Please use /search to start a new search.").await;
            }
        }
    }
}

/// Add `term` to the user's tracked set and start its poll job.
///
/// The registry write comes first: if it fails, no job is started and the
/// user is told. A duplicate term never touches the scheduler.
async fn add_term(bot: &Bot, chat_id: ChatId, ctx: &Arc<BotContext>, user: &UserId, term: &str) {
    match ctx.registry.add_term(user, term) {
        Ok(true) => {
            let job_id = ctx
                .scheduler
                .schedule(user.clone(), term, ctx.poll_interval());
            info!(%job_id, %term, "tracking started");
            send::send_text(
                bot,
                chat_id,
                &format!("Product \"{term}\" has been added to your tracked products."),
            )
            .await;
        }
        Ok(false) => {
            send::send_text(
                bot,
                chat_id,
                &format!("You already have \"{term}\" in your tracked products."),
            )
            .await;
        }
        Err(e) => {
            report_registry_error(bot, chat_id, &e).await;
            return;
        }
    }
    show_tracking_menu(bot, chat_id, ctx, user).await;
}

/// Remove `term` and cancel its poll job.
async fn remove_term(bot: &Bot, chat_id: ChatId, ctx: &Arc<BotContext>, user: &UserId, term: &str) {
    match ctx.registry.remove_term(user, term) {
        Ok(_) => {
            ctx.scheduler.cancel(&JobId::derive(user, term));
            send::send_text(
                bot,
                chat_id,
                &format!("Product \"{term}\" has been removed from your tracked products."),
            )
            .await;
            show_tracking_menu(bot, chat_id, ctx, user).await;
        }
        Err(e) => report_registry_error(bot, chat_id, &e).await,
    }
}

/// One-shot search in reply to the `/search` flow.
async fn run_search(bot: &Bot, chat_id: ChatId, ctx: &Arc<BotContext>, term: &str) {
    match ctx.source.search(term).await {
        Ok(listings) if listings.is_empty() => {
            send::send_text(bot, chat_id, &format!("No products found for '{term}'.")).await;
        }
        Ok(listings) => {
            let mut response = format!("Found {} offers for '{term}':\n\n", listings.len());
            for listing in listings.iter().take(SEARCH_PREVIEW_MAX) {
                let price = listing
                    .price_label
                    .as_deref()
                    .unwrap_or("Price not available");
                response.push_str(&format!("• {}\n{}\n{}\n\n", listing.title, price, listing.url));
            }
            if listings.len() > SEARCH_PREVIEW_MAX {
                response.push_str(&format!(
                    "... and {} more products.",
                    listings.len() - SEARCH_PREVIEW_MAX
                ));
            }
            send::send_text(bot, chat_id, &response).await;
        }
        Err(e) => {
            warn!(%term, error = %e, "interactive search failed");
            send::send_text(
                bot,
                chat_id,
                "Sorry, I couldn't fetch the data. Please try again later.",
            )
            .await;
        }
    }
}

async fn show_tracking_menu(bot: &Bot, chat_id: ChatId, ctx: &Arc<BotContext>, user: &UserId) {
    let terms = match ctx.registry.list_terms(user) {
        Ok(terms) => terms,
        Err(e) => {
            report_registry_error(bot, chat_id, &e).await;
            return;
        }
    };
    let menu = keyboard::tracking_menu(&terms, ctx.poll.tracking_limit);
    let text = if terms.is_empty() {
        "You have not added any products to track.".to_string()
    } else {
        format!(
            "You have the following products tracked:\n\n{}\n\nPress a product to stop tracking it.",
            terms.join("\n")
        )
    };
    send::send_with_keyboard(bot, chat_id, &text, menu).await;
}

async fn report_registry_error(bot: &Bot, chat_id: ChatId, err: &RegistryError) {
    warn!(error = %err, "registry operation failed");
    send::send_text(
        bot,
        chat_id,
        "Sorry, something went wrong saving your request. Please try again.",
    )
    .await;
}
