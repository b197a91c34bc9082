use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-use token scoped to a name.
///
/// Tokens are immutable once built; only the manager creates them for real
/// use. Construct one directly only for tests or to re-hydrate a stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    name: String,
    value: String,
    expiration: DateTime<Utc>,
}

impl Token {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expiration,
        }
    }

    /// Name identifying the context this token was issued for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The secret value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Last instant at which the token is still valid.
    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    /// A token expiring exactly at `now` has not expired yet.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiration
    }

    /// Check a submitted name and value against this token at `now`.
    pub fn verify(&self, name: &str, value: &str, now: DateTime<Utc>) -> bool {
        self.name == name && constant_time_eq(&self.value, value) && !self.is_expired(now)
    }
}

/// Compare two strings without short-circuiting on the first differing byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 3, 29, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_accessors() {
        let token = Token::new("my-form", "qwerty123", at(12, 30));
        assert_eq!(token.name(), "my-form");
        assert_eq!(token.value(), "qwerty123");
        assert_eq!(token.expiration(), at(12, 30));
    }

    #[test]
    fn test_is_expired_boundary() {
        let token = Token::new("my-form", "qwerty123", at(12, 30));
        assert!(!token.is_expired(at(12, 29)));
        assert!(!token.is_expired(at(12, 30)));
        assert!(token.is_expired(at(12, 30) + Duration::nanoseconds(1)));
        assert!(token.is_expired(at(12, 31)));
    }

    #[test]
    fn test_verify() {
        let token = Token::new("my-form", "qwerty123", at(12, 30));
        assert!(token.verify("my-form", "qwerty123", at(12, 29)));
        assert!(token.verify("my-form", "qwerty123", at(12, 30)));
        assert!(!token.verify("my-form", "qwerty123", at(12, 31)));
        assert!(!token.verify("my-form", "qwerty1234", at(12, 29)));
        assert!(!token.verify("my-form", "qwerty12", at(12, 29)));
        assert!(!token.verify("my-forms", "qwerty123", at(12, 29)));
    }

    #[test]
    fn test_order_scenario() {
        let now = at(10, 0);
        let token = Token::new("order-42", "abc123", now + Duration::hours(1));
        assert!(token.verify("order-42", "abc123", now + Duration::minutes(30)));
        assert!(!token.verify("order-42", "abc123", now + Duration::minutes(61)));
        assert!(!token.verify("order-42", "wrong", now + Duration::minutes(30)));
    }

    #[test]
    fn test_serde_shape() {
        let token = Token::new("a", "b", at(12, 0));
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["name"], "a");
        assert_eq!(json["value"], "b");
        let back: Token = serde_json::from_value(json).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(constant_time_eq("", ""));
    }
}
