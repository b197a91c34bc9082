use crate::error::{NonceError, NonceResult};
use rand::RngCore;
use rand::rngs::OsRng;

/// Source of random token values.
pub trait Randomizer: Send + Sync {
    /// Produce a fresh random string.
    fn randomize(&self) -> String;
}

/// Hexadecimal randomizer backed by the operating system CSPRNG.
///
/// Produces exactly `length` lowercase hex digits. Odd lengths draw one
/// extra byte and drop the leading digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexRandomizer {
    length: usize,
}

impl HexRandomizer {
    /// Length used by [`HexRandomizer::default`].
    pub const DEFAULT_LENGTH: usize = 32;

    /// Create a randomizer for `length` hex digits.
    ///
    /// Fails with [`NonceError::Configuration`] when `length` is below 1,
    /// including negative values.
    ///
    /// ```
    /// use nonceward_core::{HexRandomizer, Randomizer};
    ///
    /// let value = HexRandomizer::new(7).unwrap().randomize();
    /// assert_eq!(value.len(), 7);
    /// assert!(HexRandomizer::new(0).is_err());
    /// assert!(HexRandomizer::new(-1).is_err());
    /// ```
    pub fn new<L>(length: L) -> NonceResult<Self>
    where
        L: TryInto<usize> + Copy + std::fmt::Display,
    {
        match length.try_into() {
            Ok(length) if length >= 1 => Ok(Self { length }),
            _ => Err(NonceError::Configuration(format!(
                "Cannot set length as {}, which must be equal or greater than 1",
                length
            ))),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for HexRandomizer {
    fn default() -> Self {
        Self {
            length: Self::DEFAULT_LENGTH,
        }
    }
}

impl Randomizer for HexRandomizer {
    fn randomize(&self) -> String {
        let mut bytes = vec![0u8; self.length / 2 + self.length % 2];
        OsRng.fill_bytes(&mut bytes);
        let encoded = hex::encode(bytes);

        if self.length % 2 == 0 {
            encoded
        } else {
            encoded[1..].to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_rejects_short_lengths() {
        assert!(HexRandomizer::new(0).unwrap_err().is_configuration());
        assert!(HexRandomizer::new(-1).unwrap_err().is_configuration());
        assert!(HexRandomizer::new(i64::MIN).is_err());
    }

    #[test]
    fn test_even_lengths() {
        for length in [2usize, 8, 16, 32] {
            let value = HexRandomizer::new(length).unwrap().randomize();
            assert_eq!(value.len(), length);
            assert!(is_hex(&value), "{} is not hex", value);
        }
    }

    #[test]
    fn test_odd_lengths() {
        for length in [1usize, 7, 15, 31] {
            let value = HexRandomizer::new(length).unwrap().randomize();
            assert_eq!(value.len(), length);
            assert!(is_hex(&value), "{} is not hex", value);
        }
    }

    #[test]
    fn test_default_length() {
        let randomizer = HexRandomizer::default();
        assert_eq!(randomizer.length(), 32);
        assert_eq!(randomizer.randomize().len(), 32);
    }

    #[test]
    fn test_values_differ() {
        let randomizer = HexRandomizer::new(32).unwrap();
        assert_ne!(randomizer.randomize(), randomizer.randomize());
    }
}
