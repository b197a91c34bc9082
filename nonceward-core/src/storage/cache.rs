//! Nonce storage on top of a TTL cache.

use crate::error::{NonceError, NonceResult};
use crate::storage::NonceStorage;
use crate::token::Token;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nonceward_cache::CacheStore;
use std::sync::Arc;
use std::time::Duration;

/// Nonce storage backed by any [`CacheStore`].
///
/// Tokens are stored as JSON under `"{namespace}:{name}"` with the cache's
/// own TTL, so [`purge`](NonceStorage::purge) has nothing to do. A token
/// with no lifetime left is kept for [`MIN_ENTRY_TTL`](Self::MIN_ENTRY_TTL)
/// so that it still verifies at its exact expiration instant.
///
/// ```
/// use nonceward_cache::InMemoryCache;
/// use nonceward_core::CacheStorage;
///
/// let storage = CacheStorage::new(InMemoryCache::new()).with_namespace("checkout");
/// assert_eq!(storage.key("abc"), "checkout:abc");
/// ```
pub struct CacheStorage<C: CacheStore> {
    cache: Arc<C>,
    namespace: String,
}

impl<C: CacheStore> CacheStorage<C> {
    /// Namespace used unless [`with_namespace`](Self::with_namespace) is called.
    pub const DEFAULT_NAMESPACE: &'static str = "nonce";

    /// Shortest TTL written to the cache.
    pub const MIN_ENTRY_TTL: Duration = Duration::from_secs(1);

    pub fn new(cache: C) -> Self {
        Self::from_arc(Arc::new(cache))
    }

    /// Share a cache that other parts of the application also use.
    pub fn from_arc(cache: Arc<C>) -> Self {
        Self {
            cache,
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Set the key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    /// Cache key for the nonce named `name`.
    pub fn key(&self, name: &str) -> String {
        format!("{}:{}", self.namespace, name)
    }

    fn decode(&self, name: &str, raw: &str) -> NonceResult<Token> {
        let token: Token = serde_json::from_str(raw).map_err(|e| corrupted(name, e.to_string()))?;
        if token.name() != name {
            return Err(corrupted(
                name,
                format!("entry holds a nonce named '{}'", token.name()),
            ));
        }
        Ok(token)
    }
}

impl<C: CacheStore> Clone for CacheStorage<C> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            namespace: self.namespace.clone(),
        }
    }
}

fn corrupted(name: &str, reason: String) -> NonceError {
    NonceError::CorruptedEntry {
        name: name.to_string(),
        reason,
    }
}

#[async_trait]
impl<C: CacheStore> NonceStorage for CacheStorage<C> {
    async fn store(&self, token: &Token, ttl: Duration) -> NonceResult<()> {
        let key = self.key(token.name());
        let ttl = ttl.max(Self::MIN_ENTRY_TTL);

        let json = serde_json::to_string(token).map_err(|e| NonceError::Storage(e.to_string()))?;
        self.cache.set_json(&key, json, Some(ttl)).await?;
        Ok(())
    }

    async fn get(&self, name: &str) -> NonceResult<Option<Token>> {
        match self.cache.get_json(&self.key(name)).await? {
            Some(raw) => self.decode(name, &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn expire(&self, name: &str) -> NonceResult<()> {
        self.cache.delete(&self.key(name)).await?;
        Ok(())
    }

    async fn purge(&self, _now: DateTime<Utc>) -> NonceResult<usize> {
        Ok(0)
    }

    /// Decodes before deleting, so a corrupted entry is reported and left
    /// in place. The delete only succeeds if the entry is unchanged, which
    /// lets exactly one of several racing callers have the token.
    async fn take(&self, name: &str) -> NonceResult<Option<Token>> {
        let key = self.key(name);
        let Some(raw) = self.cache.get_json(&key).await? else {
            return Ok(None);
        };

        let token = self.decode(name, &raw)?;
        if self.cache.delete_if_eq(&key, &raw).await? {
            Ok(Some(token))
        } else {
            Ok(None)
        }
    }
}
