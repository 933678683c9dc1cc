use crate::Cache;
use crate::error::CacheError;
use ::redis::AsyncCommands;
use ::redis::aio::ConnectionManager;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

/// A Redis-backed cache.
///
/// The connection manager reconnects on its own after transient failures;
/// while the backend is down every operation degrades to a miss or a no-op.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Connects to Redis and returns a cache handle.
    ///
    /// Connecting is the one fallible step exposed to callers; once a handle
    /// exists, no backend failure ever surfaces as an error.
    pub async fn connect(url: &str, default_ttl: Duration) -> Result<Self, CacheError> {
        let client = ::redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self {
            manager,
            default_ttl,
        })
    }

    async fn try_get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn try_set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: () = conn.set_ex(key, value, self.default_ttl.as_secs()).await?;
        Ok(())
    }

    async fn try_delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: i64 = conn.del(key).await?;
        Ok(())
    }

    async fn try_delete_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        if !keys.is_empty() {
            let _: i64 = conn.del(keys).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "cache get failed, treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str) {
        if let Err(e) = self.try_set(key, value).await {
            warn!(key, error = %e, "cache set failed, skipping");
        }
    }

    async fn delete(&self, key: &str) {
        if let Err(e) = self.try_delete(key).await {
            warn!(key, error = %e, "cache delete failed, skipping");
        }
    }

    async fn delete_pattern(&self, pattern: &str) {
        if let Err(e) = self.try_delete_pattern(pattern).await {
            warn!(pattern, error = %e, "cache pattern delete failed, skipping");
        }
    }
}
