use std::sync::Arc;

use super::{
    command::{is_wallet_address, parse_product, CallbackAction, Command},
    keyboards::{ai_keyboard, community_keyboard, main_keyboard},
    messages, Reply,
};
use crate::{
    config::Config,
    db::Store,
    models::{User, UserProfile},
    services::{balance::BalanceSource, completion::Completion},
};

/// Display settings the replies depend on.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub community_url: String,
    pub slh_value_ils: f64,
}

impl BotSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            community_url: config.community_url.clone(),
            slh_value_ils: config.slh_value_ils,
        }
    }
}

/// Turns one inbound text or callback into a reply.
///
/// Never fails: store errors are logged and reported to the user as text,
/// and the balance and completion seams already fail soft.
pub struct Router {
    store: Arc<dyn Store>,
    balances: Arc<dyn BalanceSource>,
    completion: Arc<dyn Completion>,
    settings: BotSettings,
}

impl Router {
    pub fn new(
        store: Arc<dyn Store>,
        balances: Arc<dyn BalanceSource>,
        completion: Arc<dyn Completion>,
        settings: BotSettings,
    ) -> Self {
        Self {
            store,
            balances,
            completion,
            settings,
        }
    }

    /// Creates the user record on first contact.
    pub async fn record_contact(&self, profile: &UserProfile) {
        if let Err(e) = self.store.upsert_user(profile).await {
            tracing::error!("Error registering user {}: {}", profile.user_id, e);
        }
    }

    pub async fn handle_text(&self, profile: &UserProfile, text: &str) -> Reply {
        let command = Command::parse(text);
        tracing::debug!(user_id = profile.user_id, ?command, "routing message");

        match command {
            Command::Start => self.start(profile),
            Command::ShowWallet => self.show_wallet(profile.user_id).await,
            Command::SendGift => Reply::html(messages::gift_menu(
                self.settings.slh_value_ils,
                &self.settings.community_url,
            )),
            Command::AiAssistant => Reply::html(messages::AI_MENU).with_markup(ai_keyboard()),
            Command::AiChat(question) => self.ai_chat(&question).await,
            Command::JoinCommunity => {
                Reply::html(messages::community(&self.settings.community_url))
                    .with_markup(community_keyboard(&self.settings.community_url))
            }
            Command::Stats => self.stats(profile.user_id).await,
            Command::Settings => Reply::html(messages::SETTINGS),
            Command::SetWallet(address) => self.set_wallet(profile.user_id, &address).await,
            Command::Contract(body) => self.contract(profile.user_id, &body).await,
            Command::History => self.history(profile.user_id).await,
            Command::AddProduct(args) => self.add_product(profile.user_id, &args).await,
            Command::Store => self.list_products(profile.user_id).await,
            Command::Balance => self.balance(profile.user_id).await,
            Command::Fallback => Reply::plain(messages::FALLBACK).with_markup(main_keyboard()),
        }
    }

    /// `None` for callback payloads the bot does not know.
    pub async fn handle_callback(&self, profile: &UserProfile, data: &str) -> Option<Reply> {
        let action = CallbackAction::parse(data);
        tracing::debug!(user_id = profile.user_id, ?action, "routing callback");

        let reply = match action {
            CallbackAction::BackMain => Reply::plain(messages::BACK_MAIN).with_markup(main_keyboard()),
            CallbackAction::AiContractHelp => {
                let answer = self
                    .completion
                    .complete(messages::CONTRACT_HELP_PROMPT, messages::CONTRACT_HELP_CONTEXT)
                    .await;
                Reply::html(messages::contract_tips(&answer))
            }
            CallbackAction::AiInvestmentAdvice => {
                let answer = self
                    .completion
                    .complete(messages::INVESTMENT_PROMPT, messages::INVESTMENT_CONTEXT)
                    .await;
                Reply::html(messages::investment_advice(&answer))
            }
            CallbackAction::ConfirmJoin => self.confirm_join(profile.user_id).await,
            CallbackAction::Unknown(data) => {
                tracing::warn!("Ignoring unknown callback data: {}", data);
                return None;
            }
        };
        Some(reply)
    }

    fn start(&self, profile: &UserProfile) -> Reply {
        let first_name = profile.first_name.as_deref().unwrap_or_default();
        Reply::html(messages::welcome(
            first_name,
            self.settings.slh_value_ils,
            &self.settings.community_url,
        ))
        .with_markup(main_keyboard())
    }

    async fn load_user(&self, user_id: i64) -> Option<User> {
        match self.store.get_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("Error loading user {}: {}", user_id, e);
                None
            }
        }
    }

    async fn show_wallet(&self, user_id: i64) -> Reply {
        let user = self.load_user(user_id).await;
        let registered = user
            .as_ref()
            .and_then(|u| u.wallet_address.clone().map(|address| (u, address)));

        match registered {
            Some((user, address)) => {
                let balance = self.balances.get_balance(&address).await;
                Reply::html(messages::wallet_overview(
                    user,
                    &address,
                    balance,
                    self.settings.slh_value_ils,
                    &self.settings.community_url,
                ))
            }
            None => Reply::html(messages::wallet_missing(&self.settings.community_url)),
        }
    }

    async fn balance(&self, user_id: i64) -> Reply {
        let address = self.load_user(user_id).await.and_then(|u| u.wallet_address);
        match address {
            Some(address) => {
                let balance = self.balances.get_balance(&address).await;
                Reply::plain(messages::balance(balance))
            }
            None => Reply::html(messages::wallet_missing(&self.settings.community_url)),
        }
    }

    async fn set_wallet(&self, user_id: i64, address: &str) -> Reply {
        if !is_wallet_address(address) {
            return Reply::plain(messages::INVALID_WALLET);
        }

        if let Err(e) = self.store.update_wallet(user_id, address).await {
            tracing::error!("Error saving wallet: {}", e);
            return Reply::plain(messages::WALLET_SAVE_ERROR);
        }

        let balance = self.balances.get_balance(address).await;
        Reply::html(messages::wallet_saved(
            address,
            balance,
            &self.settings.community_url,
        ))
    }

    async fn ai_chat(&self, question: &str) -> Reply {
        if question.is_empty() {
            return Reply::plain(messages::AI_EMPTY_QUESTION);
        }
        if !self.completion.is_configured() {
            return Reply::plain(crate::services::completion::AI_UNAVAILABLE);
        }

        let answer = self
            .completion
            .complete(question, messages::AI_CHAT_CONTEXT)
            .await;
        Reply::html(messages::ai_answer(&answer, &self.settings.community_url))
    }

    async fn stats(&self, user_id: i64) -> Reply {
        match self.load_user(user_id).await {
            Some(user) => Reply::html(messages::stats(&user, &self.settings.community_url)),
            None => Reply::html(messages::NO_STATS),
        }
    }

    async fn confirm_join(&self, user_id: i64) -> Reply {
        match self.store.mark_joined(user_id).await {
            Ok(()) => Reply::html(messages::join_confirmed(&self.settings.community_url)),
            Err(e) => {
                tracing::error!("Error marking user {} as joined: {}", user_id, e);
                Reply::plain(messages::STORE_ERROR)
            }
        }
    }

    async fn contract(&self, user_id: i64, body: &str) -> Reply {
        if body.is_empty() {
            return match self.store.get_contract(user_id).await {
                Ok(Some(contract)) => Reply::html(messages::contract_current(&contract)),
                Ok(None) => Reply::plain(messages::CONTRACT_USAGE),
                Err(e) => {
                    tracing::error!("Error loading contract for {}: {}", user_id, e);
                    Reply::plain(messages::STORE_ERROR)
                }
            };
        }

        match self.store.save_contract(user_id, body).await {
            Ok(()) => Reply::plain(messages::CONTRACT_SAVED),
            Err(e) => {
                tracing::error!("Error saving contract for {}: {}", user_id, e);
                Reply::plain(messages::STORE_ERROR)
            }
        }
    }

    async fn history(&self, user_id: i64) -> Reply {
        match self.store.list_gifts(user_id).await {
            Ok(gifts) if gifts.is_empty() => Reply::plain(messages::HISTORY_EMPTY),
            Ok(gifts) => Reply::html(messages::history(&gifts)),
            Err(e) => {
                tracing::error!("Error loading gift history for {}: {}", user_id, e);
                Reply::plain(messages::STORE_ERROR)
            }
        }
    }

    async fn add_product(&self, user_id: i64, args: &str) -> Reply {
        let Some((name, price)) = parse_product(args) else {
            return Reply::plain(messages::PRODUCT_USAGE);
        };

        match self.store.add_product(user_id, &name, price).await {
            Ok(product) => Reply::plain(messages::product_added(&product.name)),
            Err(e) => {
                tracing::error!("Error adding product for {}: {}", user_id, e);
                Reply::plain(messages::STORE_ERROR)
            }
        }
    }

    async fn list_products(&self, user_id: i64) -> Reply {
        match self.store.list_products(user_id).await {
            Ok(products) if products.is_empty() => Reply::plain(messages::STORE_EMPTY),
            Ok(products) => Reply::plain(messages::store_listing(&products)),
            Err(e) => {
                tracing::error!("Error loading products for {}: {}", user_id, e);
                Reply::plain(messages::STORE_ERROR)
            }
        }
    }
}
