//! Redis backend. Keys are namespaced under `tradeflow:`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::client::{Backend, StoreResult};

const KEY_PREFIX: &str = "tradeflow:";

/// ConnectionManager multiplexes internally; it is cloned per operation.
#[derive(Clone)]
pub struct RedisBackend {
    manager: ConnectionManager,
}

impl RedisBackend {
    /// Connect to a Redis URL such as `redis://127.0.0.1:6379`.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager })
    }

    fn namespaced(key: &str) -> String {
        format!("{}{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl Backend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(Self::namespaced(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(Self::namespaced(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.manager.clone();
        conn.del::<_, ()>(Self::namespaced(key)).await?;
        Ok(())
    }

    async fn keys(&self) -> StoreResult<Vec<String>> {
        let mut conn = self.manager.clone();
        let pattern = format!("{}*", KEY_PREFIX);
        let mut scan: redis::AsyncIter<String> = conn.scan_match(&pattern).await?;
        let mut keys = Vec::new();
        while let Some(key) = scan.next_item().await {
            if let Some(stripped) = key.strip_prefix(KEY_PREFIX) {
                keys.push(stripped.to_string());
            }
        }
        Ok(keys)
    }
}
