//! Redis cache implementation.

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::traits::CacheStore;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::future::Future;
use std::time::Duration;

/// Redis cache store.
///
/// Every command is bounded by [`CacheConfig::operation_timeout`].
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: CacheConfig,
}

impl RedisCache {
    /// Connect to Redis.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nonceward_cache::*;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), CacheError> {
    ///     let config = CacheConfig::redis("redis://localhost:6379")?.with_key_prefix("myapp");
    ///     let cache = RedisCache::new(config).await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> CacheResult<Self> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let connection = tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Timeout)?
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        nonceward_log::info!("Connected to Redis cache at {}", config.url);

        Ok(Self { connection, config })
    }

    /// Get the underlying connection manager.
    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    fn build_key(&self, key: &str) -> String {
        self.config.build_key(key)
    }

    async fn bounded<T, F>(&self, command: F) -> CacheResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.config.operation_timeout, command).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(CacheError::Timeout),
        }
    }
}

/// Redis expirations are whole seconds; round up so an entry never
/// disappears before its TTL.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 { secs + 1 } else { secs.max(1) }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(key);
        let mut conn = self.connection.clone();
        self.bounded(conn.get(&key)).await
    }

    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()> {
        let key = self.build_key(key);
        let mut conn = self.connection.clone();

        match ttl.or(self.config.default_ttl) {
            Some(ttl) => self.bounded(conn.set_ex(&key, value, ttl_seconds(ttl))).await,
            None => self.bounded(conn.set(&key, value)).await,
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let key = self.build_key(key);
        let mut conn = self.connection.clone();
        self.bounded(conn.del(&key)).await
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let key = self.build_key(key);
        let mut conn = self.connection.clone();
        self.bounded(conn.exists(&key)).await
    }

    async fn clear(&self) -> CacheResult<()> {
        let mut conn = self.connection.clone();
        self.bounded(redis::cmd("FLUSHDB").query_async(&mut conn))
            .await
    }

    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>> {
        let key = self.build_key(key);
        let mut conn = self.connection.clone();

        let seconds: i64 = self.bounded(conn.ttl(&key)).await?;

        // -2: no such key, -1: no expiration
        match seconds {
            s if s > 0 => Ok(Some(Duration::from_secs(s as u64))),
            _ => Ok(None),
        }
    }

    async fn delete_if_eq(&self, key: &str, expected: &str) -> CacheResult<bool> {
        // Compare and delete in one round trip
        let script = r#"
            if redis.call("get", KEYS[1]) == ARGV[1] then
                return redis.call("del", KEYS[1])
            else
                return 0
            end
        "#;

        let key = self.build_key(key);
        let mut conn = self.connection.clone();
        let deleted: i32 = self
            .bounded(
                redis::Script::new(script)
                    .key(&key)
                    .arg(expected)
                    .invoke_async(&mut conn),
            )
            .await?;

        Ok(deleted == 1)
    }
}
