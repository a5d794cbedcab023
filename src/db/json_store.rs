use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::Store;
use crate::{
    constants::{CONTRACTS_FILE, HISTORY_FILE, PRODUCTS_FILE, USERS_FILE},
    error::Result,
    models::{ContractRecord, GiftRecord, Product, User, UserProfile},
};

type UsersDoc = BTreeMap<i64, User>;
type ContractsDoc = BTreeMap<i64, ContractRecord>;

/// Flat-file backend: one JSON document per collection, rewritten in full on
/// every write.
///
/// There is no locking. Two writers touching the same document can race and
/// the later write silently drops the earlier one.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    async fn load<T>(&self, file: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(file);
        match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(T::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(self.path(file), bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for JsonStore {
    fn backend(&self) -> &'static str {
        "json"
    }

    async fn is_healthy(&self) -> bool {
        tokio::fs::metadata(&self.dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    async fn upsert_user(&self, profile: &UserProfile) -> Result<()> {
        let mut users: UsersDoc = self.load(USERS_FILE).await?;
        if users.contains_key(&profile.user_id) {
            return Ok(());
        }
        users.insert(profile.user_id, User::from_profile(profile, Utc::now()));
        self.save(USERS_FILE, &users).await
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let mut users: UsersDoc = self.load(USERS_FILE).await?;
        Ok(users.remove(&user_id))
    }

    async fn update_wallet(&self, user_id: i64, wallet_address: &str) -> Result<()> {
        let mut users: UsersDoc = self.load(USERS_FILE).await?;
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(());
        };
        user.wallet_address = Some(wallet_address.to_string());
        self.save(USERS_FILE, &users).await
    }

    async fn mark_joined(&self, user_id: i64) -> Result<()> {
        let mut users: UsersDoc = self.load(USERS_FILE).await?;
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(());
        };
        user.joined_group = true;
        self.save(USERS_FILE, &users).await
    }

    async fn record_gift(&self, gift: &GiftRecord) -> Result<()> {
        let mut history: Vec<GiftRecord> = self.load(HISTORY_FILE).await?;
        history.push(gift.clone());
        self.save(HISTORY_FILE, &history).await?;

        let mut users: UsersDoc = self.load(USERS_FILE).await?;
        let mut touched = false;
        for user in users.values_mut() {
            if user.user_id == gift.sender_id {
                user.total_gifts_sent += gift.amount;
                touched = true;
            }
            if user.wallet_address.as_deref() == Some(gift.recipient_address.as_str()) {
                user.total_gifts_received += gift.amount;
                touched = true;
            }
        }
        if touched {
            self.save(USERS_FILE, &users).await?;
        }
        Ok(())
    }

    async fn list_gifts(&self, sender_id: i64) -> Result<Vec<GiftRecord>> {
        let history: Vec<GiftRecord> = self.load(HISTORY_FILE).await?;
        Ok(history
            .into_iter()
            .filter(|gift| gift.sender_id == sender_id)
            .collect())
    }

    async fn save_contract(&self, user_id: i64, body: &str) -> Result<()> {
        let mut contracts: ContractsDoc = self.load(CONTRACTS_FILE).await?;
        contracts.insert(
            user_id,
            ContractRecord {
                user_id,
                body: body.to_string(),
                updated_at: Utc::now(),
            },
        );
        self.save(CONTRACTS_FILE, &contracts).await
    }

    async fn get_contract(&self, user_id: i64) -> Result<Option<ContractRecord>> {
        let mut contracts: ContractsDoc = self.load(CONTRACTS_FILE).await?;
        Ok(contracts.remove(&user_id))
    }

    async fn add_product(&self, owner_id: i64, name: &str, price_slh: f64) -> Result<Product> {
        let mut products: Vec<Product> = self.load(PRODUCTS_FILE).await?;
        let product = Product {
            id: products.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            owner_id,
            name: name.to_string(),
            price_slh,
            created_at: Utc::now(),
        };
        products.push(product.clone());
        self.save(PRODUCTS_FILE, &products).await?;
        Ok(product)
    }

    async fn list_products(&self, owner_id: i64) -> Result<Vec<Product>> {
        let products: Vec<Product> = self.load(PRODUCTS_FILE).await?;
        Ok(products
            .into_iter()
            .filter(|product| product.owner_id == owner_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: i64, first_name: &str) -> UserProfile {
        UserProfile {
            user_id,
            username: None,
            first_name: Some(first_name.to_string()),
            last_name: None,
        }
    }

    #[tokio::test]
    async fn missing_documents_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        assert!(store.get_user(1).await.unwrap().is_none());
        assert!(store.list_gifts(1).await.unwrap().is_empty());
        assert!(store.get_contract(1).await.unwrap().is_none());
        assert!(store.is_healthy().await);
    }

    #[tokio::test]
    async fn upsert_twice_keeps_first_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        store.upsert_user(&profile(1, "First")).await.unwrap();
        store.update_wallet(1, "0x111111111111111111111111111111111111111a").await.unwrap();
        store.upsert_user(&profile(1, "Second")).await.unwrap();

        let users: UsersDoc = store.load(USERS_FILE).await.unwrap();
        assert_eq!(users.len(), 1);
        let user = &users[&1];
        assert_eq!(user.first_name.as_deref(), Some("First"));
        assert_eq!(
            user.wallet_address.as_deref(),
            Some("0x111111111111111111111111111111111111111a")
        );
    }

    #[tokio::test]
    async fn update_wallet_for_unknown_user_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        store.update_wallet(5, "0x1111111111111111111111111111111111111111").await.unwrap();
        assert!(store.get_user(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn gifts_are_appended_in_order_and_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        store.upsert_user(&profile(9, "Sender")).await.unwrap();

        for i in 0..4 {
            let gift = GiftRecord::new(9, "0x3333333333333333333333333333333333333333", 2.5, Some(format!("tx{}", i)));
            store.record_gift(&gift).await.unwrap();
        }
        store
            .record_gift(&GiftRecord::new(8, "0x3333333333333333333333333333333333333333", 1.0, None))
            .await
            .unwrap();

        let reopened = JsonStore::open(dir.path()).await.unwrap();
        let gifts = reopened.list_gifts(9).await.unwrap();
        let refs: Vec<_> = gifts.iter().filter_map(|g| g.tx_hash.clone()).collect();
        assert_eq!(refs, vec!["tx0", "tx1", "tx2", "tx3"]);
        assert_eq!(reopened.get_user(9).await.unwrap().unwrap().total_gifts_sent, 10.0);
    }

    #[tokio::test]
    async fn mark_joined_and_contracts_roundtrip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        store.upsert_user(&profile(2, "B")).await.unwrap();
        store.mark_joined(2).await.unwrap();
        store.mark_joined(2).await.unwrap();
        store.save_contract(2, "v1").await.unwrap();
        store.save_contract(2, "v2").await.unwrap();

        assert!(store.get_user(2).await.unwrap().unwrap().joined_group);
        assert_eq!(store.get_contract(2).await.unwrap().unwrap().body, "v2");
    }

    #[tokio::test]
    async fn products_get_increasing_ids_and_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).await.unwrap();
        assert!(store.list_products(3).await.unwrap().is_empty());

        let first = store.add_product(3, "Mug", 12.5).await.unwrap();
        let other = store.add_product(4, "Hat", 1.0).await.unwrap();
        let second = store.add_product(3, "Shirt", 40.0).await.unwrap();
        assert_eq!((first.id, other.id, second.id), (1, 2, 3));

        let reopened = JsonStore::open(dir.path()).await.unwrap();
        let products = reopened.list_products(3).await.unwrap();
        assert_eq!(products, vec![first, second]);
    }
}
