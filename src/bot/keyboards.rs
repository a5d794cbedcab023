use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};
use url::Url;

use super::command::{
    CB_AI_CONTRACT_HELP, CB_AI_INVESTMENT_ADVICE, CB_BACK_MAIN, CB_CONFIRM_JOIN, LABEL_AI,
    LABEL_COMMUNITY, LABEL_SEND_GIFT, LABEL_SETTINGS, LABEL_STATS, LABEL_WALLET,
};

/// Persistent 3x2 menu shown under the input box.
pub fn main_keyboard() -> ReplyMarkup {
    let rows = [
        [LABEL_WALLET, LABEL_SEND_GIFT],
        [LABEL_AI, LABEL_COMMUNITY],
        [LABEL_STATS, LABEL_SETTINGS],
    ];
    let keyboard = rows
        .iter()
        .map(|row| row.iter().map(|label| KeyboardButton::new(*label)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    ReplyMarkup::Keyboard(KeyboardMarkup::new(keyboard).resize_keyboard())
}

fn back_row() -> Vec<InlineKeyboardButton> {
    vec![InlineKeyboardButton::callback("🔙 חזרה", CB_BACK_MAIN)]
}

pub fn ai_keyboard() -> ReplyMarkup {
    ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "📝 עזרה בכתיבת חוזה",
            CB_AI_CONTRACT_HELP,
        )],
        vec![InlineKeyboardButton::callback(
            "💡 ייעוץ השקעות",
            CB_AI_INVESTMENT_ADVICE,
        )],
        back_row(),
    ]))
}

/// Link row is omitted when the community URL does not parse.
pub fn community_keyboard(community_url: &str) -> ReplyMarkup {
    let mut rows = Vec::with_capacity(3);
    match Url::parse(community_url) {
        Ok(url) => rows.push(vec![InlineKeyboardButton::url("👥 הצטרף לקהילה", url)]),
        Err(e) => tracing::warn!("Community link {} is not a URL: {}", community_url, e),
    }
    rows.push(vec![InlineKeyboardButton::callback(
        "✅ אישור הצטרפות",
        CB_CONFIRM_JOIN,
    )]);
    rows.push(back_row());
    ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows))
}
