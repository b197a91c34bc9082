use crate::clock::{Clock, FixedClock, SystemClock};
use crate::config::{NonceConfig, validate_expiration_interval, validate_name_prefix};
use crate::error::{NonceError, NonceResult};
use crate::random::{HexRandomizer, Randomizer};
use crate::storage::NonceStorage;
use crate::token::Token;
use chrono::{DateTime, TimeDelta, Utc};
use nonceward_log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Creates, verifies, expires and purges nonces.
///
/// The manager owns no tokens itself; everything lives in the storage
/// backend. Clones share the storage, randomizer and clock.
///
/// # Examples
///
/// ```
/// use nonceward_core::{MemoryStorage, NoncesManager};
///
/// # tokio_test::block_on(async {
/// let manager = NoncesManager::new(MemoryStorage::new());
///
/// let token = manager.create(Some("delete-account"), None).await?;
/// assert!(manager.verify_and_expire("delete-account", token.value()).await?);
///
/// // one-shot: the second attempt finds nothing
/// assert!(!manager.verify_and_expire("delete-account", token.value()).await?);
/// # Ok::<(), nonceward_core::NonceError>(())
/// # }).unwrap();
/// ```
pub struct NoncesManager<S: NonceStorage> {
    storage: Arc<S>,
    randomizer: Arc<dyn Randomizer>,
    clock: Arc<dyn Clock>,
    expiration_interval: Duration,
    name_prefix: String,
}

impl<S: NonceStorage> NoncesManager<S> {
    /// Manager with a 32-digit hex randomizer, a one hour expiration
    /// interval and the system clock.
    pub fn new(storage: S) -> Self {
        let defaults = NonceConfig::default();
        Self {
            storage: Arc::new(storage),
            randomizer: Arc::new(HexRandomizer::default()),
            clock: Arc::new(SystemClock),
            expiration_interval: defaults.expiration_interval,
            name_prefix: defaults.name_prefix,
        }
    }

    /// Manager built from a validated configuration.
    pub fn from_config(storage: S, config: &NonceConfig) -> NonceResult<Self> {
        config.validate()?;
        let randomizer = HexRandomizer::new(config.value_length)?;

        Ok(Self {
            randomizer: Arc::new(randomizer),
            expiration_interval: config.expiration_interval,
            name_prefix: config.name_prefix.clone(),
            ..Self::new(storage)
        })
    }

    /// Replace the randomizer.
    pub fn with_randomizer(mut self, randomizer: impl Randomizer + 'static) -> Self {
        self.randomizer = Arc::new(randomizer);
        self
    }

    /// Set the default lifetime of created nonces. Zero is rejected.
    pub fn with_expiration_interval(mut self, interval: Duration) -> NonceResult<Self> {
        validate_expiration_interval(interval)?;
        self.expiration_interval = interval;
        Ok(self)
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Freeze the manager's notion of "now" at `now`.
    pub fn with_now(self, now: DateTime<Utc>) -> Self {
        self.with_clock(Arc::new(FixedClock::new(now)))
    }

    /// Set the prefix of generated nonce names.
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> NonceResult<Self> {
        let prefix = prefix.into();
        validate_name_prefix(&prefix)?;
        self.name_prefix = prefix;
        Ok(self)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn expiration_interval(&self) -> Duration {
        self.expiration_interval
    }

    /// Current instant according to the manager's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create and store a nonce.
    ///
    /// Without a `name` a unique one is generated; generated names never
    /// contain `:`. Without a `ttl` the manager's expiration interval applies.
    /// An existing nonce with the same name is replaced.
    pub async fn create(&self, name: Option<&str>, ttl: Option<Duration>) -> NonceResult<Token> {
        let ttl = ttl.unwrap_or(self.expiration_interval);
        let delta = TimeDelta::from_std(ttl).map_err(|_| {
            NonceError::Configuration(format!("expiration interval {:?} is out of range", ttl))
        })?;
        let expiration = self.now().checked_add_signed(delta).ok_or_else(|| {
            NonceError::Configuration(format!("expiration interval {:?} is out of range", ttl))
        })?;

        self.issue(name, expiration, ttl).await
    }

    /// Create and store a nonce that expires at a fixed instant.
    ///
    /// An `expiration` already in the past yields a token that never
    /// verifies.
    pub async fn create_expiring_at(
        &self,
        name: Option<&str>,
        expiration: DateTime<Utc>,
    ) -> NonceResult<Token> {
        let remaining = (expiration - self.now()).to_std().unwrap_or(Duration::ZERO);
        self.issue(name, expiration, remaining).await
    }

    async fn issue(
        &self,
        name: Option<&str>,
        expiration: DateTime<Utc>,
        ttl: Duration,
    ) -> NonceResult<Token> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.generate_name(),
        };

        let token = Token::new(name, self.randomizer.randomize(), expiration);
        self.storage.store(&token, ttl).await?;

        debug!("Created nonce '{}' expiring at {}", token.name(), token.expiration());
        Ok(token)
    }

    /// Whether a live nonce named `name` has exactly `value`.
    ///
    /// Does not consume the nonce. Fails only on storage errors, including
    /// [`NonceError::CorruptedEntry`].
    pub async fn verify(&self, name: &str, value: &str) -> NonceResult<bool> {
        let stored = self.storage.get(name).await.inspect_err(|e| log_failure(name, e))?;
        Ok(self.check(stored, name, value))
    }

    /// Verify and then remove the nonce whatever the outcome, so a nonce
    /// can succeed at most once.
    ///
    /// Uses [`NonceStorage::take`]; on backends with an atomic take this
    /// also holds when requests race on the same nonce.
    pub async fn verify_and_expire(&self, name: &str, value: &str) -> NonceResult<bool> {
        let stored = self.storage.take(name).await.inspect_err(|e| log_failure(name, e))?;
        let valid = self.check(stored, name, value);
        debug!("Consumed nonce '{}' (valid: {})", name, valid);
        Ok(valid)
    }

    /// Remove the nonce named `name`, if any.
    pub async fn expire(&self, name: &str) -> NonceResult<()> {
        self.storage.expire(name).await?;
        debug!("Expired nonce '{}'", name);
        Ok(())
    }

    /// Sweep expired nonces from storage. Returns how many were removed.
    pub async fn purge(&self) -> NonceResult<usize> {
        let removed = self.storage.purge(self.now()).await?;
        debug!("Purged {} expired nonces", removed);
        Ok(removed)
    }

    fn check(&self, stored: Option<Token>, name: &str, value: &str) -> bool {
        let Some(token) = stored else {
            debug!("No nonce named '{}'", name);
            return false;
        };

        let now = self.now();
        if token.verify(name, value, now) {
            return true;
        }
        if token.is_expired(now) {
            warn!("Nonce '{}' expired at {}", name, token.expiration());
        }
        false
    }

    fn generate_name(&self) -> String {
        format!("{}-{}", self.name_prefix, Uuid::new_v4().simple())
    }
}

impl<S: NonceStorage> Clone for NoncesManager<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            randomizer: self.randomizer.clone(),
            clock: self.clock.clone(),
            expiration_interval: self.expiration_interval,
            name_prefix: self.name_prefix.clone(),
        }
    }
}

fn log_failure(name: &str, err: &NonceError) {
    if err.is_corrupted_entry() {
        error!("Storage holds a corrupted entry for nonce '{}': {}", name, err);
    } else {
        error!("Storage failed while reading nonce '{}': {}", name, err);
    }
}
