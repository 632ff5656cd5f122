//! Store pool and backend abstraction.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::{MemoryBackend, RedisBackend, SqliteBackend};

/// Store error types.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A raw string key-value backend.
///
/// Implementations only move opaque strings around; JSON handling lives in
/// [`StorePool`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// All keys currently stored, unprefixed.
    async fn keys(&self) -> StoreResult<Vec<String>>;
}

/// Which backend a pool should open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Sqlite(PathBuf),
    Redis(String),
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sqlite(path) => write!(f, "sqlite:{}", path.display()),
            Self::Redis(url) => write!(f, "{}", url),
        }
    }
}

/// Shared handle to the entity store. Cheap to clone.
#[derive(Clone)]
pub struct StorePool {
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for StorePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorePool")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl StorePool {
    pub fn new<B: Backend + 'static>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub async fn get_raw(&self, key: &str) -> StoreResult<Option<String>> {
        self.backend.get(key).await
    }

    pub async fn set_raw(&self, key: &str, value: &str) -> StoreResult<()> {
        self.backend.set(key, value).await
    }

    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        debug!(key, "Removing key");
        self.backend.remove(key).await
    }

    /// Keys starting with `prefix`, sorted.
    pub async fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .backend
            .keys()
            .await?
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Read a JSON array, defaulting to empty.
    ///
    /// A missing key and an unparsable value both yield an empty vector;
    /// only backend failures are reported as errors.
    pub async fn read_array<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let raw = self.backend.get(key).await?;
        let Some(raw) = raw else {
            debug!(key, "Key missing, using empty collection");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => {
                debug!(key, count = items.len(), "Read collection");
                Ok(items)
            }
            Err(e) => {
                warn!(key, error = %e, "Stored collection is not valid JSON, using empty collection");
                Ok(Vec::new())
            }
        }
    }

    /// Overwrite a key with the full JSON array.
    pub async fn write_array<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string(items)?;
        debug!(key, count = items.len(), bytes = json.len(), "Writing collection");
        self.backend.set(key, &json).await
    }

    /// Read a single JSON value. Unparsable values read as absent.
    pub async fn read_value<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Stored value is not valid JSON, ignoring");
                Ok(None)
            }
        }
    }

    pub async fn write_value<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string(value)?;
        debug!(key, bytes = json.len(), "Writing value");
        self.backend.set(key, &json).await
    }

    /// Remove every key. Returns how many were removed.
    pub async fn clear(&self) -> StoreResult<usize> {
        let keys = self.backend.keys().await?;
        for key in &keys {
            self.backend.remove(key).await?;
        }
        Ok(keys.len())
    }
}

/// Open a store pool for the given backend.
pub async fn init_pool(kind: &BackendKind) -> StoreResult<StorePool> {
    let pool = match kind {
        BackendKind::Memory => StorePool::new(MemoryBackend::new()),
        BackendKind::Sqlite(path) => StorePool::new(SqliteBackend::open(path)?),
        BackendKind::Redis(url) => StorePool::new(RedisBackend::connect(url).await?),
    };
    debug!(backend = %kind, "Store pool initialized");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
    }

    #[tokio::test]
    async fn test_read_array_missing_key_is_empty() {
        let pool = StorePool::in_memory();
        let items: Vec<Item> = pool.read_array("contracts").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_read_array_corrupt_json_is_empty() {
        let pool = StorePool::in_memory();
        pool.set_raw("contracts", "{not json").await.unwrap();
        let items: Vec<Item> = pool.read_array("contracts").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_write_array_overwrites() {
        let pool = StorePool::in_memory();
        pool.write_array("items", &[Item { id: 1 }, Item { id: 2 }]).await.unwrap();
        pool.write_array("items", &[Item { id: 3 }]).await.unwrap();
        let items: Vec<Item> = pool.read_array("items").await.unwrap();
        assert_eq!(items, vec![Item { id: 3 }]);
    }

    #[tokio::test]
    async fn test_keys_with_prefix_and_clear() {
        let pool = StorePool::in_memory();
        pool.set_raw("buyer_pending_contracts_b2", "[]").await.unwrap();
        pool.set_raw("buyer_pending_contracts_b1", "[]").await.unwrap();
        pool.set_raw("contracts", "[]").await.unwrap();

        let keys = pool.keys_with_prefix("buyer_pending_contracts_").await.unwrap();
        assert_eq!(keys, vec!["buyer_pending_contracts_b1", "buyer_pending_contracts_b2"]);

        assert_eq!(pool.clear().await.unwrap(), 3);
        assert!(pool.get_raw("contracts").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_value_ignores_garbage() {
        let pool = StorePool::in_memory();
        pool.set_raw("userDetails", "garbage").await.unwrap();
        let value: Option<Item> = pool.read_value("userDetails").await.unwrap();
        assert!(value.is_none());

        pool.write_value("userDetails", &Item { id: 7 }).await.unwrap();
        let value: Option<Item> = pool.read_value("userDetails").await.unwrap();
        assert_eq!(value, Some(Item { id: 7 }));
    }
}
