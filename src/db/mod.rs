use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    models::{ContractRecord, GiftRecord, Product, User, UserProfile},
};

pub mod json_store;

pub use json_store::JsonStore;

/// Persistence seam shared by the SQLite and JSON backends.
///
/// Writes are "last write wins"; neither backend offers transactions that span
/// more than one call.
#[async_trait]
pub trait Store: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn is_healthy(&self) -> bool;

    /// Creates the user on first contact. Existing records are left untouched.
    async fn upsert_user(&self, profile: &UserProfile) -> Result<()>;

    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Stores the address verbatim. No-op when the user does not exist.
    async fn update_wallet(&self, user_id: i64, wallet_address: &str) -> Result<()>;

    async fn mark_joined(&self, user_id: i64) -> Result<()>;

    /// Appends to the gift log and bumps the sender/recipient counters.
    async fn record_gift(&self, gift: &GiftRecord) -> Result<()>;

    /// Gifts sent by `sender_id`, oldest first.
    async fn list_gifts(&self, sender_id: i64) -> Result<Vec<GiftRecord>>;

    async fn save_contract(&self, user_id: i64, body: &str) -> Result<()>;

    async fn get_contract(&self, user_id: i64) -> Result<Option<ContractRecord>>;

    async fn add_product(&self, owner_id: i64, name: &str, price_slh: f64) -> Result<Product>;

    /// Products listed by `owner_id`, oldest first.
    async fn list_products(&self, owner_id: i64) -> Result<Vec<Product>>;
}

/// Builds the backend selected by `STORE_BACKEND`.
pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    match config.store_backend.as_str() {
        "json" => {
            let store = JsonStore::open(&config.json_store_dir).await?;
            Ok(Arc::new(store))
        }
        _ => {
            let db = Database::new(config).await?;
            db.ensure_schema().await?;
            Ok(Arc::new(db))
        }
    }
}

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.database_max_connections.max(1))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Creates the tables when missing. There is no migration history.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT,
                last_name TEXT,
                wallet_address TEXT,
                phone TEXT,
                website TEXT,
                materials TEXT,
                total_gifts_sent REAL NOT NULL DEFAULT 0,
                total_gifts_received REAL NOT NULL DEFAULT 0,
                joined_group BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS gifts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_id INTEGER NOT NULL,
                recipient_address TEXT NOT NULL,
                amount REAL NOT NULL,
                tx_hash TEXT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (sender_id) REFERENCES users (user_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contracts (
                user_id INTEGER PRIMARY KEY,
                body TEXT NOT NULL,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                price_slh REAL NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ==================== USER QUERIES ====================
#[async_trait]
impl Store for Database {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn is_healthy(&self) -> bool {
        self.pool.acquire().await.is_ok()
    }

    async fn upsert_user(&self, profile: &UserProfile) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO users (user_id, username, first_name, last_name, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(profile.user_id)
        .bind(&profile.username)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, User>(
            "SELECT user_id, username, first_name, last_name, wallet_address, phone, website,
                    materials, total_gifts_sent, total_gifts_received, joined_group, created_at
             FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_wallet(&self, user_id: i64, wallet_address: &str) -> Result<()> {
        sqlx::query("UPDATE users SET wallet_address = ? WHERE user_id = ?")
            .bind(wallet_address)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn mark_joined(&self, user_id: i64) -> Result<()> {
        sqlx::query("UPDATE users SET joined_group = TRUE WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== GIFT QUERIES ====================
    async fn record_gift(&self, gift: &GiftRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO gifts (sender_id, recipient_address, amount, tx_hash, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(gift.sender_id)
        .bind(&gift.recipient_address)
        .bind(gift.amount)
        .bind(&gift.tx_hash)
        .bind(gift.created_at)
        .execute(&self.pool)
        .await?;

        sqlx::query("UPDATE users SET total_gifts_sent = total_gifts_sent + ? WHERE user_id = ?")
            .bind(gift.amount)
            .bind(gift.sender_id)
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "UPDATE users SET total_gifts_received = total_gifts_received + ?
             WHERE wallet_address = ?",
        )
        .bind(gift.amount)
        .bind(&gift.recipient_address)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_gifts(&self, sender_id: i64) -> Result<Vec<GiftRecord>> {
        let gifts = sqlx::query_as::<_, GiftRecord>(
            "SELECT sender_id, recipient_address, amount, tx_hash, created_at
             FROM gifts WHERE sender_id = ? ORDER BY id ASC",
        )
        .bind(sender_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(gifts)
    }

    // ==================== CONTRACT QUERIES ====================
    async fn save_contract(&self, user_id: i64, body: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO contracts (user_id, body, updated_at) VALUES (?, ?, ?)
             ON CONFLICT (user_id) DO UPDATE
             SET body = excluded.body, updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(body)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_contract(&self, user_id: i64) -> Result<Option<ContractRecord>> {
        let row = sqlx::query_as::<_, ContractRecord>(
            "SELECT user_id, body, updated_at FROM contracts WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // ==================== PRODUCT QUERIES ====================
    async fn add_product(&self, owner_id: i64, name: &str, price_slh: f64) -> Result<Product> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO products (owner_id, name, price_slh, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(owner_id)
        .bind(name)
        .bind(price_slh)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            owner_id,
            name: name.to_string(),
            price_slh,
            created_at,
        })
    }

    async fn list_products(&self, owner_id: i64) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, owner_id, name, price_slh, created_at
             FROM products WHERE owner_id = ? ORDER BY id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }
}

#[cfg(test)]
pub async fn memory_database() -> Database {
    let db = Database::new(&crate::config::test_config())
        .await
        .expect("in-memory sqlite");
    db.ensure_schema().await.expect("schema");
    db
}
