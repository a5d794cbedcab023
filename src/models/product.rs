use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Item listed in a user's personal store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub price_slh: f64,
    pub created_at: DateTime<Utc>,
}
