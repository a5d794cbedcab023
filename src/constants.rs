/// Application constants

// Token
pub const TOKEN_SYMBOL: &str = "SLH";
pub const SLH_TOKEN_ADDRESS: &str = "0xACb0A09414CEA1C879c67bB7A877E4e19480f022";
pub const SLH_VALUE_ILS: f64 = 444.0;

// Chain
pub const DEFAULT_BSC_RPC_URL: &str = "https://bsc-dataseed.binance.org/";
pub const WALLET_ADDRESS_PREFIX: &str = "0x";
pub const WALLET_ADDRESS_LEN: usize = 42;

// Community
pub const COMMUNITY_URL: &str = "https://t.me/+HIzvM8sEgh1kNWY0";

// Telegram
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

// Completion providers
pub const OPENAI_API_URL: &str = "https://api.openai.com";
pub const HUGGINGFACE_API_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "gpt2";
pub const DEFAULT_COMPLETION_MAX_TOKENS: u32 = 150;

// JSON store documents
pub const USERS_FILE: &str = "users.json";
pub const HISTORY_FILE: &str = "history.json";
pub const CONTRACTS_FILE: &str = "contracts.json";
pub const PRODUCTS_FILE: &str = "products.json";
