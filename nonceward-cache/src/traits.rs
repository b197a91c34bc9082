//! Cache store trait definition.

use crate::error::CacheResult;
use async_trait::async_trait;
use std::time::Duration;

/// A string-valued key/value cache with optional per-entry TTL.
///
/// Backends evict entries on their own once the TTL passes; callers never
/// sweep.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value from the cache.
    ///
    /// Returns `Ok(None)` if the key is absent or its TTL has elapsed.
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a value in the cache, replacing any previous value.
    ///
    /// # Arguments
    ///
    /// * `key` - The cache key
    /// * `value` - The serialized value
    /// * `ttl` - Optional time-to-live duration
    async fn set_json(&self, key: &str, value: String, ttl: Option<Duration>) -> CacheResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check if a live key exists.
    async fn exists(&self, key: &str) -> CacheResult<bool>;

    /// Clear all keys from the cache.
    ///
    /// **Warning:** on shared backends this affects every key, not only
    /// the ones written through this store.
    async fn clear(&self) -> CacheResult<()>;

    /// Remaining TTL of a key.
    ///
    /// Returns `Ok(None)` if the key has no expiration or doesn't exist.
    async fn ttl(&self, key: &str) -> CacheResult<Option<Duration>>;

    /// Delete `key` only if it currently holds `expected`.
    ///
    /// Returns whether the key was deleted. The default implementation is a
    /// read followed by a delete, so two concurrent callers can both see a
    /// match. Backends that can compare and delete in one step should
    /// override it.
    async fn delete_if_eq(&self, key: &str, expected: &str) -> CacheResult<bool> {
        if self.get_json(key).await?.as_deref() != Some(expected) {
            return Ok(false);
        }
        self.delete(key).await?;
        Ok(true)
    }
}
