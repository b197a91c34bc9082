use crate::error::{NonceError, NonceResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Nonce manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonceConfig {
    /// How long a created nonce stays valid
    #[serde(rename = "expiration_secs", with = "duration_secs")]
    pub expiration_interval: Duration,

    /// Number of hex digits in a nonce value
    pub value_length: usize,

    /// Prefix for manager-generated nonce names
    pub name_prefix: String,
}

impl Default for NonceConfig {
    fn default() -> Self {
        Self {
            expiration_interval: Duration::from_secs(3600), // 1 hour
            value_length: 32,
            name_prefix: "nonce".to_string(),
        }
    }
}

impl NonceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `NONCEWARD_EXPIRATION_SECS`, `NONCEWARD_VALUE_LENGTH` and
    /// `NONCEWARD_NAME_PREFIX`, keeping the default for anything unset.
    pub fn from_env() -> NonceResult<Self> {
        let mut config = Self::default();

        if let Some(secs) = env_parse::<u64>("NONCEWARD_EXPIRATION_SECS")? {
            config.expiration_interval = Duration::from_secs(secs);
        }
        if let Some(length) = env_parse::<usize>("NONCEWARD_VALUE_LENGTH")? {
            config.value_length = length;
        }
        if let Ok(prefix) = env::var("NONCEWARD_NAME_PREFIX") {
            config.name_prefix = prefix;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set expiration interval
    pub fn with_expiration_interval(mut self, interval: Duration) -> Self {
        self.expiration_interval = interval;
        self
    }

    /// Set value length
    pub fn with_value_length(mut self, length: usize) -> Self {
        self.value_length = length;
        self
    }

    /// Set name prefix
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Reject settings the manager cannot work with.
    ///
    /// Generated names are embedded in `name:value` form fields, so the
    /// prefix may not contain a colon.
    pub fn validate(&self) -> NonceResult<()> {
        if self.value_length < 1 {
            return Err(NonceError::Configuration(
                "value_length must be equal or greater than 1".to_string(),
            ));
        }
        validate_expiration_interval(self.expiration_interval)?;
        validate_name_prefix(&self.name_prefix)
    }
}

pub(crate) fn validate_expiration_interval(interval: Duration) -> NonceResult<()> {
    if interval.is_zero() {
        return Err(NonceError::Configuration(
            "expiration_interval must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_name_prefix(prefix: &str) -> NonceResult<()> {
    if prefix.is_empty() {
        return Err(NonceError::Configuration(
            "name_prefix must not be empty".to_string(),
        ));
    }
    if prefix.contains(':') {
        return Err(NonceError::Configuration(format!(
            "name_prefix '{}' must not contain ':'",
            prefix
        )));
    }
    Ok(())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> NonceResult<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| NonceError::Configuration(format!("{} has invalid value '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
