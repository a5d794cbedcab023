pub mod command;
pub mod dispatcher;
pub mod keyboards;
pub mod messages;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::Dispatcher;
pub use router::{BotSettings, Router};

use teloxide::types::{ParseMode, ReplyMarkup};

/// What the bot sends back for one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub markup: Option<ReplyMarkup>,
}

impl Reply {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
            markup: None,
        }
    }

    /// Sent with HTML parse mode. User-supplied text inside must already be
    /// escaped.
    pub fn html(text: impl Into<String>) -> Self {
        Self {
            parse_mode: Some(ParseMode::Html),
            ..Self::plain(text)
        }
    }

    pub fn with_markup(mut self, markup: ReplyMarkup) -> Self {
        self.markup = Some(markup);
        self
    }
}
