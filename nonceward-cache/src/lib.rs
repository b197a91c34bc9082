//! TTL cache backends for nonceward.
//!
//! A [`CacheStore`] holds string values under string keys, each with an
//! optional time-to-live after which the backend forgets it on its own.
//! The nonce storage layer serializes tokens into these values.
//!
//! # Features
//!
//! - `redis` - Enable the Redis backend
//!
//! # Examples
//!
//! ## In-process cache
//!
//! ```
//! use nonceward_cache::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let cache = InMemoryCache::new();
//! cache.set_json("key", "value".to_string(), Some(Duration::from_secs(60))).await?;
//! assert_eq!(cache.get_json("key").await?, Some("value".to_string()));
//! # Ok::<(), CacheError>(())
//! # }).unwrap();
//! ```
//!
//! ## Redis (requires `redis` feature)
//!
//! ```ignore
//! use nonceward_cache::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CacheError> {
//!     let config = CacheConfig::redis("redis://localhost:6379")?;
//!     let cache = RedisCache::new(config).await?;
//!
//!     cache.set_json("key", "value".to_string(), Some(Duration::from_secs(60))).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "redis")]
pub mod redis_cache;

pub use config::CacheConfig;
pub use error::{CacheError, CacheResult};
pub use memory::InMemoryCache;
pub use traits::CacheStore;

#[cfg(feature = "redis")]
pub use redis_cache::RedisCache;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::CacheConfig;
    pub use crate::error::{CacheError, CacheResult};
    pub use crate::memory::InMemoryCache;
    pub use crate::traits::CacheStore;

    #[cfg(feature = "redis")]
    pub use crate::redis_cache::RedisCache;
}
