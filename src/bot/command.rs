use crate::constants::{WALLET_ADDRESS_LEN, WALLET_ADDRESS_PREFIX};

// Main menu labels
pub const LABEL_WALLET: &str = "👛 הארנק שלי";
pub const LABEL_SEND_GIFT: &str = "🎁 שלח מתנה";
pub const LABEL_AI: &str = "🤖 עוזר AI";
pub const LABEL_COMMUNITY: &str = "👥 הצטרף לקהילה";
pub const LABEL_STATS: &str = "📊 סטטיסטיקות";
pub const LABEL_SETTINGS: &str = "⚙️ הגדרות";

// Callback payloads
pub const CB_BACK_MAIN: &str = "back_main";
pub const CB_AI_CONTRACT_HELP: &str = "ai_contract_help";
pub const CB_AI_INVESTMENT_ADVICE: &str = "ai_investment_advice";
pub const CB_CONFIRM_JOIN: &str = "confirm_join";

/// One inbound text message, classified once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    ShowWallet,
    SendGift,
    AiAssistant,
    AiChat(String),
    JoinCommunity,
    Stats,
    Settings,
    SetWallet(String),
    Contract(String),
    History,
    /// Raw `name, price` text after `/add`.
    AddProduct(String),
    Store,
    Balance,
    Fallback,
}

impl Command {
    /// Precedence: menu label, wallet shape, command prefix, fallback.
    pub fn parse(text: &str) -> Self {
        match text {
            LABEL_WALLET => return Self::ShowWallet,
            LABEL_SEND_GIFT => return Self::SendGift,
            LABEL_AI => return Self::AiAssistant,
            LABEL_COMMUNITY => return Self::JoinCommunity,
            LABEL_STATS => return Self::Stats,
            LABEL_SETTINGS => return Self::Settings,
            _ => {}
        }

        if is_wallet_address(text) {
            return Self::SetWallet(text.to_string());
        }

        if command_argument(text, "/start").is_some() || command_argument(text, "/help").is_some()
        {
            return Self::Start;
        }
        if let Some(question) = command_argument(text, "/ai") {
            return Self::AiChat(question);
        }
        if let Some(body) = command_argument(text, "/contract") {
            return Self::Contract(body);
        }
        if command_argument(text, "/history").is_some() {
            return Self::History;
        }
        if let Some(args) = command_argument(text, "/add") {
            return Self::AddProduct(args);
        }
        if command_argument(text, "/store").is_some() {
            return Self::Store;
        }
        if command_argument(text, "/balance").is_some() {
            return Self::Balance;
        }

        Self::Fallback
    }
}

/// Shape check only: `0x` prefix and 42 characters. Hex digits are not
/// validated.
pub fn is_wallet_address(text: &str) -> bool {
    text.starts_with(WALLET_ADDRESS_PREFIX) && text.chars().count() == WALLET_ADDRESS_LEN
}

/// Splits `/add` arguments into a product name and a non-negative price.
pub fn parse_product(args: &str) -> Option<(String, f64)> {
    let (name, price) = args.split_once(',')?;
    let name = name.trim();
    let price: f64 = price.trim().parse().ok()?;
    if name.is_empty() || !price.is_finite() || price < 0.0 {
        return None;
    }
    Some((name.to_string(), price))
}

// Text after a command prefix, minus an optional `@botname` suffix.
fn command_argument(text: &str, command: &str) -> Option<String> {
    let rest = text.strip_prefix(command)?;
    let rest = match rest.strip_prefix('@') {
        Some(mention) => mention
            .split_once(char::is_whitespace)
            .map(|(_, tail)| tail)
            .unwrap_or(""),
        None => rest,
    };
    Some(rest.trim().to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    BackMain,
    AiContractHelp,
    AiInvestmentAdvice,
    ConfirmJoin,
    Unknown(String),
}

impl CallbackAction {
    pub fn parse(data: &str) -> Self {
        match data {
            CB_BACK_MAIN => Self::BackMain,
            CB_AI_CONTRACT_HELP => Self::AiContractHelp,
            CB_AI_INVESTMENT_ADVICE => Self::AiInvestmentAdvice,
            CB_CONFIRM_JOIN => Self::ConfirmJoin,
            other => Self::Unknown(other.to_string()),
        }
    }
}
