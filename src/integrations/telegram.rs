//! Outbound half of the Bot API. Inbound updates and keyboards use the
//! `teloxide` types directly; this module owns the `BotApi` seam and the
//! `teloxide::Bot` backed client behind it.

use async_trait::async_trait;
use teloxide::{
    requests::Requester,
    types::{ChatId, ParseMode, ReplyMarkup, User as TgUser},
    Bot,
};
use url::Url;

use crate::{
    error::{AppError, Result},
    models::UserProfile,
};

impl From<&TgUser> for UserProfile {
    fn from(user: &TgUser) -> Self {
        UserProfile {
            user_id: user.id.0 as i64,
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()).filter(|name| !name.is_empty()),
            last_name: user.last_name.clone(),
        }
    }
}

/// The four Bot API methods the bot calls. Tests substitute a recording fake.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<()>;

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()>;

    async fn set_webhook(&self, url: &str) -> Result<bool>;

    /// URL currently registered with Telegram (empty when none).
    async fn webhook_url(&self) -> Result<String>;
}

#[derive(Clone, Debug)]
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(api_url: &str, bot_token: &str) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| AppError::Telegram(format!("invalid API URL {}: {}", api_url, e)))?;
        Ok(Self {
            bot: Bot::new(bot_token).set_api_url(api_url),
        })
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<()> {
        let mut req = self.bot.send_message(chat_id, text);
        req.parse_mode = parse_mode;
        req.reply_markup = reply_markup;
        req.await?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
        self.bot
            .answer_callback_query(callback_query_id.to_string())
            .await?;
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<bool> {
        let url = Url::parse(url)
            .map_err(|e| AppError::BadRequest(format!("invalid webhook URL {}: {}", url, e)))?;
        self.bot.set_webhook(url).await?;
        Ok(true)
    }

    async fn webhook_url(&self) -> Result<String> {
        let info = self.bot.get_webhook_info().await?;
        Ok(info.url.map(|url| url.to_string()).unwrap_or_default())
    }
}
