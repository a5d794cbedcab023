use serde::Deserialize;
use std::env;

use crate::constants::{
    COMMUNITY_URL, DEFAULT_BSC_RPC_URL, DEFAULT_COMPLETION_MAX_TOKENS,
    SLH_TOKEN_ADDRESS, SLH_VALUE_ILS, TELEGRAM_API_URL,
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Telegram
    pub bot_token: String,
    pub telegram_api_url: String,
    pub webhook_url: Option<String>,

    // Persistence
    pub store_backend: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub json_store_dir: String,

    // Blockchain
    pub bsc_rpc_url: String,
    pub slh_token_address: String,
    pub slh_value_ils: f64,

    // Completion
    pub completion_provider: String,
    pub completion_api_url: Option<String>,
    pub completion_model: Option<String>,
    pub completion_max_tokens: u32,
    pub openai_api_key: Option<String>,
    pub huggingface_token: Option<String>,

    // Community
    pub community_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()),

            bot_token: env::var("BOT_TOKEN")
                .map_err(|_| anyhow::anyhow!("BOT_TOKEN must be set in environment variables"))?,
            telegram_api_url: env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| TELEGRAM_API_URL.to_string()),
            webhook_url: non_empty_var("TELEGRAM_WEBHOOK_URL"),

            store_backend: env::var("STORE_BACKEND").unwrap_or_else(|_| "sqlite".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:slh_platform.db".to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            json_store_dir: env::var("JSON_STORE_DIR").unwrap_or_else(|_| ".".to_string()),

            bsc_rpc_url: env::var("BSC_RPC_URL")
                .unwrap_or_else(|_| DEFAULT_BSC_RPC_URL.to_string()),
            slh_token_address: env::var("SLH_TOKEN_ADDRESS")
                .unwrap_or_else(|_| SLH_TOKEN_ADDRESS.to_string()),
            slh_value_ils: env::var("SLH_VALUE_ILS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(SLH_VALUE_ILS),

            completion_provider: env::var("COMPLETION_PROVIDER")
                .unwrap_or_else(|_| "openai".to_string()),
            completion_api_url: non_empty_var("COMPLETION_API_URL"),
            completion_model: non_empty_var("COMPLETION_MODEL"),
            completion_max_tokens: env::var("COMPLETION_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_COMPLETION_MAX_TOKENS),
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            huggingface_token: non_empty_var("HUGGINGFACE_TOKEN"),

            community_url: env::var("COMMUNITY_URL").unwrap_or_else(|_| COMMUNITY_URL.to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if url::Url::parse(&self.telegram_api_url).is_err() {
            anyhow::bail!("TELEGRAM_API_URL is not a valid URL");
        }
        if url::Url::parse(&self.bsc_rpc_url).is_err() {
            anyhow::bail!("BSC_RPC_URL is not a valid URL");
        }
        if url::Url::parse(&self.community_url).is_err() {
            anyhow::bail!("COMMUNITY_URL is not a valid URL");
        }
        match self.store_backend.as_str() {
            "sqlite" => {
                if self.database_url.trim().is_empty() {
                    anyhow::bail!("DATABASE_URL is empty");
                }
            }
            "json" => {
                if self.json_store_dir.trim().is_empty() {
                    anyhow::bail!("JSON_STORE_DIR is empty");
                }
            }
            other => anyhow::bail!("Unsupported STORE_BACKEND: {}", other),
        }

        if self.webhook_url.is_none() {
            tracing::warn!("TELEGRAM_WEBHOOK_URL not set; /set_webhook will report failure");
        }
        if !self.completion_configured() {
            tracing::warn!(
                "No credential for completion provider '{}'; AI replies are disabled",
                self.completion_provider
            );
        }
        if self.slh_value_ils <= 0.0 {
            tracing::warn!("SLH_VALUE_ILS should be > 0");
        }

        Ok(())
    }

    pub fn completion_configured(&self) -> bool {
        match self.completion_provider.as_str() {
            "huggingface" => self.huggingface_token.is_some(),
            _ => self.openai_api_key.is_some(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 10000,
        environment: "test".to_string(),
        bot_token: "123456:test-token".to_string(),
        telegram_api_url: "http://127.0.0.1:1".to_string(),
        webhook_url: Some("https://bot.example.com/webhook".to_string()),
        store_backend: "sqlite".to_string(),
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        json_store_dir: ".".to_string(),
        bsc_rpc_url: "http://127.0.0.1:1".to_string(),
        slh_token_address: SLH_TOKEN_ADDRESS.to_string(),
        slh_value_ils: SLH_VALUE_ILS,
        completion_provider: "openai".to_string(),
        completion_api_url: None,
        completion_model: None,
        completion_max_tokens: DEFAULT_COMPLETION_MAX_TOKENS,
        openai_api_key: None,
        huggingface_token: None,
        community_url: COMMUNITY_URL.to_string(),
    }
}
