use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ==================== USER ====================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub wallet_address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub materials: Option<String>,
    pub total_gifts_sent: f64,
    pub total_gifts_received: f64,
    pub joined_group: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Fresh record for a first contact. Counters start at zero.
    pub fn from_profile(profile: &UserProfile, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id: profile.user_id,
            username: profile.username.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            wallet_address: None,
            phone: None,
            website: None,
            materials: None,
            total_gifts_sent: 0.0,
            total_gifts_received: 0.0,
            joined_group: false,
            created_at,
        }
    }

    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{} {}", first, last).trim().to_string()
    }
}

/// Identity fields taken from the Telegram sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

// ==================== GIFTS ====================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GiftRecord {
    pub sender_id: i64,
    pub recipient_address: String,
    pub amount: f64,
    pub tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GiftRecord {
    pub fn new(
        sender_id: i64,
        recipient_address: impl Into<String>,
        amount: f64,
        tx_hash: Option<String>,
    ) -> Self {
        Self {
            sender_id,
            recipient_address: recipient_address.into(),
            amount,
            tx_hash,
            created_at: Utc::now(),
        }
    }
}

// ==================== CONTRACTS ====================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ContractRecord {
    pub user_id: i64,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}
