use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod bot;
mod config;
mod constants;
mod db;
mod error;
mod integrations;
mod models;
mod services;

use bot::{BotSettings, Dispatcher, Router};
use config::Config;
use integrations::telegram::{BotApi, TelegramClient};
use services::{
    balance::{BalanceSource, Bep20Balance},
    completion::{completion_from_config, Completion},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slh_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting SLH bot");
    tracing::info!("Environment: {}", config.environment);

    let store = db::open_store(&config).await?;
    tracing::info!("Store backend: {}", store.backend());

    let balances: Arc<dyn BalanceSource> = Arc::new(Bep20Balance::from_config(&config)?);
    let completion: Arc<dyn Completion> = Arc::from(completion_from_config(&config));

    let telegram: Arc<dyn BotApi> = Arc::new(TelegramClient::new(
        &config.telegram_api_url,
        &config.bot_token,
    )?);

    let router = Router::new(
        store.clone(),
        balances,
        completion,
        BotSettings::from_config(&config),
    );
    let app_state = api::AppState {
        dispatcher: Arc::new(Dispatcher::new(router, telegram.clone())),
        telegram,
        store,
        config: config.clone(),
    };

    let app = api::build_router(app_state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
