//! # nonceward core
//!
//! Single-use security tokens ("nonces") that protect a sensitive action
//! from being replayed, such as a form resubmission.
//!
//! ## Features
//!
//! - **Name-scoped tokens** - each nonce belongs to a form or action name
//! - **One-shot consumption** - `verify_and_expire` succeeds at most once
//! - **Pluggable storage** - an in-process map or any TTL cache
//! - **Pluggable randomness** - OS-backed hex values by default
//! - **Deterministic time** - inject a clock for tests
//!
//! ## Quick Start
//!
//! ```rust
//! use nonceward_core::{MemoryStorage, NoncesManager};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let manager = NoncesManager::new(MemoryStorage::new())
//!     .with_expiration_interval(Duration::from_secs(600))?;
//!
//! let token = manager.create(Some("transfer"), None).await?;
//!
//! assert!(manager.verify("transfer", token.value()).await?);
//! assert!(!manager.verify("transfer", "guess").await?);
//! # Ok::<(), nonceward_core::NonceError>(())
//! # }).unwrap();
//! ```
//!
//! ## Cache-backed storage
//!
//! ```rust
//! use nonceward_cache::InMemoryCache;
//! use nonceward_core::{CacheStorage, NoncesManager};
//!
//! # tokio_test::block_on(async {
//! // Entries carry the nonce lifetime as their cache TTL; no purge needed.
//! let manager = NoncesManager::new(CacheStorage::new(InMemoryCache::new()));
//! let token = manager.create(None, None).await?;
//! assert!(manager.verify_and_expire(token.name(), token.value()).await?);
//! # Ok::<(), nonceward_core::NonceError>(())
//! # }).unwrap();
//! ```
//!
//! ## Concurrency
//!
//! `verify` followed by `expire` is two storage calls; requests racing on the
//! same nonce can both see it. `verify_and_expire` goes through
//! [`NonceStorage::take`], which is atomic for [`MemoryStorage`] and for
//! [`CacheStorage`] over the bundled caches.

pub mod clock;
pub mod config;
pub mod error;
pub mod manager;
pub mod random;
pub mod storage;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::NonceConfig;
pub use error::{NonceError, NonceResult};
pub use manager::NoncesManager;
pub use random::{HexRandomizer, Randomizer};
pub use storage::{CacheStorage, MemoryStorage, NonceStorage, SharedNonceMap};
pub use token::Token;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::NonceConfig;
    pub use crate::error::{NonceError, NonceResult};
    pub use crate::manager::NoncesManager;
    pub use crate::random::{HexRandomizer, Randomizer};
    pub use crate::storage::{CacheStorage, MemoryStorage, NonceStorage, SharedNonceMap};
    pub use crate::token::Token;
}
