pub mod health;
pub mod webhook;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{bot::Dispatcher, config::Config, db::Store, integrations::telegram::BotApi};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub telegram: Arc<dyn BotApi>,
    pub store: Arc<dyn Store>,
    pub config: Config,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/status", get(health::status))
        .route("/health", get(health::health_check))
        .route("/webhook", post(webhook::receive_update))
        .route("/set_webhook", get(webhook::set_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
