use crate::domain::ports::KeyValueStoreRef;
use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const USERS_KEY: &str = "shopease_users";
pub const TOKEN_KEY: &str = "shopease_token";
pub const USER_KEY: &str = "shopease_user";
pub const ORDERS_KEY: &str = "shopease_orders";

pub fn cart_key(user_id: &str) -> String {
    format!("shopease_cart_{user_id}")
}

/// Typed JSON access on top of a [`KeyValueStore`](crate::domain::ports::KeyValueStore).
#[derive(Clone)]
pub struct Repository {
    store: KeyValueStoreRef,
}

impl Repository {
    pub fn new(store: KeyValueStoreRef) -> Self {
        Self { store }
    }

    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Loads a list, treating a missing key as empty.
    pub async fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.load(key).await?.unwrap_or_default())
    }

    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, raw).await
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::KeyValueStore;
    use crate::error::ShopError;
    use crate::infrastructure::in_memory::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_repository_json_roundtrip() {
        let repo = Repository::new(Arc::new(InMemoryStore::new()));
        repo.save("numbers", &vec![1, 2, 3]).await.unwrap();

        let loaded: Vec<u32> = repo.load_list("numbers").await.unwrap();
        assert_eq!(loaded, vec![1, 2, 3]);

        let missing: Vec<u32> = repo.load_list("nothing").await.unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_repository_reports_corrupt_values() {
        let store = Arc::new(InMemoryStore::new());
        store.set(ORDERS_KEY, "{not json".to_string()).await.unwrap();

        let repo = Repository::new(store);
        let result: Result<Option<Vec<u32>>> = repo.load(ORDERS_KEY).await;
        assert!(matches!(result, Err(ShopError::SerializationError(_))));
    }

    #[test]
    fn test_cart_key_is_per_user() {
        assert_eq!(cart_key("42"), "shopease_cart_42");
    }
}
