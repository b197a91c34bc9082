//! Nonce storage capability and its implementations.

use crate::error::NonceResult;
use crate::token::Token;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

pub mod cache;
pub mod memory;

pub use cache::CacheStorage;
pub use memory::{MemoryStorage, SharedNonceMap};

/// Storage for live tokens, keyed by token name.
///
/// A backend holds at most one token per name; storing a token replaces
/// whatever was stored under its name.
#[async_trait]
pub trait NonceStorage: Send + Sync {
    /// Persist `token`, replacing any token with the same name.
    ///
    /// `ttl` is how long the token has left to live. Backends with native
    /// expiry use it; others ignore it and rely on [`purge`](Self::purge).
    async fn store(&self, token: &Token, ttl: Duration) -> NonceResult<()>;

    /// Fetch the token stored under `name`.
    ///
    /// Returns `Ok(None)` if there is none or the backend already evicted it.
    async fn get(&self, name: &str) -> NonceResult<Option<Token>>;

    /// Remove the token stored under `name`. A missing name is a no-op.
    async fn expire(&self, name: &str) -> NonceResult<()>;

    /// Remove every token that has expired at `now` and return how many
    /// were removed. Backends that evict on their own may do nothing.
    async fn purge(&self, now: DateTime<Utc>) -> NonceResult<usize>;

    /// Remove the token stored under `name` and return it.
    ///
    /// The default is [`get`](Self::get) followed by [`expire`](Self::expire)
    /// and is not atomic: two concurrent callers may both receive the token.
    async fn take(&self, name: &str) -> NonceResult<Option<Token>> {
        let token = self.get(name).await?;
        self.expire(name).await?;
        Ok(token)
    }
}

#[async_trait]
impl<S: NonceStorage + ?Sized> NonceStorage for Arc<S> {
    async fn store(&self, token: &Token, ttl: Duration) -> NonceResult<()> {
        (**self).store(token, ttl).await
    }

    async fn get(&self, name: &str) -> NonceResult<Option<Token>> {
        (**self).get(name).await
    }

    async fn expire(&self, name: &str) -> NonceResult<()> {
        (**self).expire(name).await
    }

    async fn purge(&self, now: DateTime<Utc>) -> NonceResult<usize> {
        (**self).purge(now).await
    }

    async fn take(&self, name: &str) -> NonceResult<Option<Token>> {
        (**self).take(name).await
    }
}
