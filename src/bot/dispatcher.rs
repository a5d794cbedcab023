use std::sync::Arc;

use teloxide::types::{CallbackQuery, ChatId, Message, Update, UpdateKind};

use super::{Reply, Router};
use crate::{integrations::telegram::BotApi, models::UserProfile};

/// Routes a webhook update and delivers the reply through the Bot API.
pub struct Dispatcher {
    router: Router,
    api: Arc<dyn BotApi>,
}

impl Dispatcher {
    pub fn new(router: Router, api: Arc<dyn BotApi>) -> Self {
        Self { router, api }
    }

    /// Bot API failures are logged, not returned: a rejected reply must not
    /// make Telegram redeliver the update.
    pub async fn process_update(&self, update: Update) {
        tracing::debug!("Processing update {:?}", update.id);

        match update.kind {
            UpdateKind::Message(message) => self.process_message(message).await,
            UpdateKind::CallbackQuery(query) => self.process_callback(query).await,
            other => tracing::debug!("Ignoring update kind {:?}", other),
        }
    }

    async fn process_message(&self, message: Message) {
        // Stickers, photos, service messages and anonymous senders are ignored.
        let (Some(from), Some(text)) = (message.from.as_ref(), message.text()) else {
            return;
        };

        let profile = UserProfile::from(from);
        self.router.record_contact(&profile).await;
        let reply = self.router.handle_text(&profile, text).await;
        self.deliver(message.chat.id, reply).await;
    }

    async fn process_callback(&self, query: CallbackQuery) {
        // Stop the client spinner before any slow work.
        if let Err(e) = self.api.answer_callback_query(&query.id).await {
            tracing::warn!("Failed to answer callback query {}: {}", query.id, e);
        }

        let profile = UserProfile::from(&query.from);
        self.router.record_contact(&profile).await;

        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat().id)
            .unwrap_or(ChatId(profile.user_id));
        let data = query.data.as_deref().unwrap_or_default();

        if let Some(reply) = self.router.handle_callback(&profile, data).await {
            self.deliver(chat_id, reply).await;
        }
    }

    async fn deliver(&self, chat_id: ChatId, reply: Reply) {
        if let Err(e) = self
            .api
            .send_message(chat_id, &reply.text, reply.parse_mode, reply.markup)
            .await
        {
            tracing::error!("Failed to deliver reply to chat {}: {}", chat_id.0, e);
        }
    }
}
