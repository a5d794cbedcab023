//! Fakes for the bot's outbound seams.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use teloxide::types::{ChatId, ParseMode, ReplyMarkup};

use super::{BotSettings, Router};
use crate::{
    constants::COMMUNITY_URL,
    db::Store,
    error::{AppError, Result},
    integrations::telegram::BotApi,
    models::{ContractRecord, GiftRecord, Product, User, UserProfile},
    services::{
        balance::BalanceSource,
        completion::{Completion, AI_UNAVAILABLE},
    },
};

pub const WALLET: &str = "0x111111111111111111111111111111111111111a";

pub fn profile(user_id: i64) -> UserProfile {
    UserProfile {
        user_id,
        username: Some("dana".to_string()),
        first_name: Some("Dana".to_string()),
        last_name: None,
    }
}

pub fn settings() -> BotSettings {
    BotSettings {
        community_url: COMMUNITY_URL.to_string(),
        slh_value_ils: 444.0,
    }
}

#[derive(Default)]
pub struct FixedBalance {
    pub value: f64,
    pub calls: AtomicUsize,
}

impl FixedBalance {
    pub fn new(value: f64) -> Arc<Self> {
        Arc::new(Self {
            value,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl BalanceSource for FixedBalance {
    async fn get_balance(&self, _address: &str) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.value
    }
}

/// Answers with a fixed string and counts how often it was asked.
pub struct ScriptedCompletion {
    configured: bool,
    answer: String,
    pub calls: AtomicUsize,
    pub last_context: Mutex<Option<String>>,
}

impl ScriptedCompletion {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            configured: true,
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
            last_context: Mutex::new(None),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            configured: false,
            answer: String::new(),
            calls: AtomicUsize::new(0),
            last_context: Mutex::new(None),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn complete(&self, _prompt: &str, context: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_context.lock() {
            *last = Some(context.to_string());
        }
        if !self.configured {
            return AI_UNAVAILABLE.to_string();
        }
        self.answer.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub parse_mode: Option<ParseMode>,
    pub markup: Option<ReplyMarkup>,
}

#[derive(Default)]
pub struct RecordingBotApi {
    pub sent: Mutex<Vec<SentMessage>>,
    pub answered: Mutex<Vec<String>>,
    /// Successful Bot API methods in call order.
    pub calls: Mutex<Vec<&'static str>>,
    pub registered: Mutex<Option<String>>,
    pub fail_send: bool,
    pub fail_answer: bool,
}

impl RecordingBotApi {
    pub fn failing() -> Self {
        Self {
            fail_send: true,
            ..Self::default()
        }
    }

    pub fn failing_answers() -> Self {
        Self {
            fail_answer: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn answered(&self) -> Vec<String> {
        self.answered
            .lock()
            .map(|answered| answered.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BotApi for RecordingBotApi {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
        reply_markup: Option<ReplyMarkup>,
    ) -> Result<()> {
        if self.fail_send {
            return Err(AppError::Telegram(
                "Bad Request: can't parse entities".to_string(),
            ));
        }
        self.calls.lock().unwrap().push("sendMessage");
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            parse_mode,
            markup: reply_markup,
        });
        Ok(())
    }

    async fn answer_callback_query(&self, callback_query_id: &str) -> Result<()> {
        if self.fail_answer {
            return Err(AppError::Telegram("query is too old".to_string()));
        }
        self.calls.lock().unwrap().push("answerCallbackQuery");
        self.answered
            .lock()
            .unwrap()
            .push(callback_query_id.to_string());
        Ok(())
    }

    async fn set_webhook(&self, url: &str) -> Result<bool> {
        *self.registered.lock().unwrap() = Some(url.to_string());
        Ok(true)
    }

    async fn webhook_url(&self) -> Result<String> {
        Ok(self.registered.lock().unwrap().clone().unwrap_or_default())
    }
}

/// Every call fails, as a database that went away would.
pub struct FailingStore;

fn gone() -> AppError {
    AppError::Internal("store unavailable".to_string())
}

#[async_trait]
impl Store for FailingStore {
    fn backend(&self) -> &'static str {
        "failing"
    }

    async fn is_healthy(&self) -> bool {
        false
    }

    async fn upsert_user(&self, _profile: &UserProfile) -> Result<()> {
        Err(gone())
    }

    async fn get_user(&self, _user_id: i64) -> Result<Option<User>> {
        Err(gone())
    }

    async fn update_wallet(&self, _user_id: i64, _wallet_address: &str) -> Result<()> {
        Err(gone())
    }

    async fn mark_joined(&self, _user_id: i64) -> Result<()> {
        Err(gone())
    }

    async fn record_gift(&self, _gift: &GiftRecord) -> Result<()> {
        Err(gone())
    }

    async fn list_gifts(&self, _sender_id: i64) -> Result<Vec<GiftRecord>> {
        Err(gone())
    }

    async fn save_contract(&self, _user_id: i64, _body: &str) -> Result<()> {
        Err(gone())
    }

    async fn get_contract(&self, _user_id: i64) -> Result<Option<ContractRecord>> {
        Err(gone())
    }

    async fn add_product(&self, _owner_id: i64, _name: &str, _price_slh: f64) -> Result<Product> {
        Err(gone())
    }

    async fn list_products(&self, _owner_id: i64) -> Result<Vec<Product>> {
        Err(gone())
    }
}

pub fn router_with(
    store: Arc<dyn Store>,
    balances: Arc<dyn BalanceSource>,
    completion: Arc<dyn Completion>,
) -> Router {
    Router::new(store, balances, completion, settings())
}
