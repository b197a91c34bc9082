// Nonceward - single-use security tokens for Rust
//
// This library issues name-scoped random tokens, verifies them once and
// expires them, with storage in process or in a TTL cache.

// Re-export core functionality
pub use nonceward_core::*;

// Re-export the logging facade
pub use nonceward_log;

// Re-export optional crates
#[cfg(feature = "cache")]
pub use nonceward_cache;

#[cfg(feature = "form")]
pub use nonceward_form;

#[cfg(feature = "form")]
pub use nonceward_form::{FormInput, NonceForm};

// Prelude for common imports
pub mod prelude {
    pub use nonceward_core::prelude::*;

    #[cfg(feature = "cache")]
    pub use nonceward_cache::{CacheStore, InMemoryCache};

    #[cfg(feature = "redis")]
    pub use nonceward_cache::{CacheConfig, RedisCache};

    #[cfg(feature = "form")]
    pub use nonceward_form::prelude::*;
}
