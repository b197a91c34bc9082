use nonceward_cache::CacheError;
use thiserror::Error;

/// Errors raised by the nonce lifecycle.
///
/// A token that simply fails to verify (wrong name, wrong value, expired or
/// absent) is not an error; those cases are `Ok(false)`.
#[derive(Error, Debug)]
pub enum NonceError {
    /// Invalid construction parameters, such as a randomizer length below 1.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The storage backend holds something under a nonce key that is not a
    /// token for that name.
    #[error("Corrupted nonce entry '{name}': {reason}")]
    CorruptedEntry { name: String, reason: String },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl NonceError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, NonceError::Configuration(_))
    }

    pub fn is_corrupted_entry(&self) -> bool {
        matches!(self, NonceError::CorruptedEntry { .. })
    }
}

pub type NonceResult<T> = std::result::Result<T, NonceError>;
