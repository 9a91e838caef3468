//! Reply keyboards for the bot menus.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

/// Label of the button that starts the add-term flow.
pub const ADD_BUTTON: &str = "Add product to track";
/// Label of the button that returns to the main menu.
pub const BACK_BUTTON: &str = "Back";

/// Main menu: one button per top-level command.
pub fn main_menu() -> KeyboardMarkup {
    let mut markup = KeyboardMarkup::new(vec![
        vec![KeyboardButton::new("/search")],
        vec![KeyboardButton::new("/tracking")],
    ]);
    markup.resize_keyboard = true;
    markup
}

/// Tracking menu: the add button while under `limit`, one button per tracked
/// term (pressing it stops tracking that term), and Back at the bottom.
pub fn tracking_menu(terms: &[String], limit: usize) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = Vec::new();
    if terms.len() < limit {
        rows.push(vec![KeyboardButton::new(ADD_BUTTON)]);
    }
    for term in terms {
        rows.push(vec![KeyboardButton::new(term.clone())]);
    }
    rows.push(vec![KeyboardButton::new(BACK_BUTTON)]);

    let mut markup = KeyboardMarkup::new(rows);
    markup.resize_keyboard = true;
    markup
}
