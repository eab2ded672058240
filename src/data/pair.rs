//! Trading pair identifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the base and quote symbol
const PAIR_SEPARATOR: char = '-';

/// A base/quote currency pair identifier (e.g. "BTC-BUSD")
///
/// Equality, ordering, and hashing follow string identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pair(String);

impl Pair {
    /// Create a pair from any string-like value
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Pair identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base currency of the pair (e.g. "BTC")
    pub fn base(&self) -> Option<&str> {
        self.split().map(|(base, _)| base)
    }

    /// Quote currency of the pair (e.g. "BUSD")
    pub fn quote(&self) -> Option<&str> {
        self.split().map(|(_, quote)| quote)
    }

    /// A valid pair is exactly two non-empty symbols joined by the separator
    pub fn is_valid(&self) -> bool {
        self.split().is_some()
    }

    fn split(&self) -> Option<(&str, &str)> {
        match self.0.split_once(PAIR_SEPARATOR) {
            Some((base, quote))
                if !base.is_empty() && !quote.is_empty() && !quote.contains(PAIR_SEPARATOR) =>
            {
                Some((base, quote))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Pair {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<String> for Pair {
    fn from(symbol: String) -> Self {
        Self::new(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_and_quote() {
        let pair = Pair::from("BTC-BUSD");
        assert!(pair.is_valid());
        assert_eq!(pair.base(), Some("BTC"));
        assert_eq!(pair.quote(), Some("BUSD"));
        assert_eq!(pair.to_string(), "BTC-BUSD");
    }

    #[test]
    fn test_invalid_pairs() {
        assert!(!Pair::from("BTCBUSD").is_valid());
        assert!(!Pair::from("BTC-").is_valid());
        assert!(!Pair::from("-BUSD").is_valid());
        assert!(!Pair::from("BTC-BUSD-PERP").is_valid());
        assert_eq!(Pair::from("BTCBUSD").base(), None);
    }
}
