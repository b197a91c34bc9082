//! In-process nonce storage.

use crate::error::NonceResult;
use crate::storage::NonceStorage;
use crate::token::Token;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A name-to-token map that can be shared with other owners, such as a
/// per-user session record.
pub type SharedNonceMap = Arc<RwLock<HashMap<String, Token>>>;

/// Nonce storage over a caller-supplied map.
///
/// Entries never disappear on their own; call
/// [`NoncesManager::purge`](crate::NoncesManager::purge) to sweep expired ones.
///
/// ```
/// use nonceward_core::{MemoryStorage, SharedNonceMap};
///
/// let session_nonces = SharedNonceMap::default();
/// let storage = MemoryStorage::with_map(session_nonces.clone());
/// ```
#[derive(Clone, Default)]
pub struct MemoryStorage {
    data: SharedNonceMap,
}

impl MemoryStorage {
    /// Storage over a fresh, unshared map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage over `data`. Writes through this storage are visible to
    /// every other holder of the map.
    pub fn with_map(data: SharedNonceMap) -> Self {
        Self { data }
    }

    /// The underlying map.
    pub fn map(&self) -> &SharedNonceMap {
        &self.data
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl NonceStorage for MemoryStorage {
    async fn store(&self, token: &Token, _ttl: Duration) -> NonceResult<()> {
        self.data
            .write()
            .await
            .insert(token.name().to_string(), token.clone());
        Ok(())
    }

    async fn get(&self, name: &str) -> NonceResult<Option<Token>> {
        Ok(self.data.read().await.get(name).cloned())
    }

    async fn expire(&self, name: &str) -> NonceResult<()> {
        self.data.write().await.remove(name);
        Ok(())
    }

    async fn purge(&self, now: DateTime<Utc>) -> NonceResult<usize> {
        let mut data = self.data.write().await;
        let before = data.len();
        data.retain(|_, token| !token.is_expired(now));
        Ok(before - data.len())
    }

    async fn take(&self, name: &str) -> NonceResult<Option<Token>> {
        Ok(self.data.write().await.remove(name))
    }
}
