//! Per-minute depth records

use crate::{DepthError, Result};
use serde::{Deserialize, Serialize};

/// Scalar tokens per minute record (bid price, bid size, ask price, ask size)
pub const TOKENS_PER_MINUTE: usize = 4;

/// Minutes in one calendar day
pub const MINUTES_PER_DAY: usize = 1440;

/// One minute's best bid/ask price and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRecord {
    /// Best bid price
    pub bid_price: f64,
    /// Size resting at the best bid
    pub bid_size: f64,
    /// Best ask price
    pub ask_price: f64,
    /// Size resting at the best ask
    pub ask_size: f64,
}

impl DepthRecord {
    /// Parse one record from its four stringified tokens
    pub fn from_tokens(tokens: &[String]) -> Result<Self> {
        if tokens.len() != TOKENS_PER_MINUTE {
            return Err(DepthError::ParseFailure {
                what: "depth record",
                value: tokens.join(","),
            });
        }
        Ok(Self {
            bid_price: parse_token("bid price", &tokens[0])?,
            bid_size: parse_token("bid size", &tokens[1])?,
            ask_price: parse_token("ask price", &tokens[2])?,
            ask_size: parse_token("ask size", &tokens[3])?,
        })
    }

    /// Bid/ask spread relative to the bid price
    pub fn spread_percentage(&self) -> f64 {
        (self.ask_price - self.bid_price) / self.bid_price
    }

    /// Book imbalance in [-1, 1]; positive when the bid side is heavier
    pub fn imbalance(&self) -> f64 {
        (self.bid_size - self.ask_size) / (self.bid_size + self.ask_size)
    }
}

fn parse_token(what: &'static str, value: &str) -> Result<f64> {
    value.parse().map_err(|_| DepthError::ParseFailure {
        what,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: [&str; 4]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_from_tokens() {
        let record =
            DepthRecord::from_tokens(&tokens(["16500.5", "1.25", "16501.0", "0.75"])).unwrap();
        assert_eq!(record.bid_price, 16500.5);
        assert_eq!(record.bid_size, 1.25);
        assert_eq!(record.ask_price, 16501.0);
        assert_eq!(record.ask_size, 0.75);
    }

    #[test]
    fn test_derived_metrics() {
        let record = DepthRecord {
            bid_price: 100.0,
            bid_size: 3.0,
            ask_price: 101.0,
            ask_size: 1.0,
        };
        assert!((record.spread_percentage() - 0.01).abs() < 1e-12);
        assert!((record.imbalance() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bad_token_is_reported() {
        let err =
            DepthRecord::from_tokens(&tokens(["16500.5", "abc", "16501.0", "0.75"])).unwrap_err();
        assert!(matches!(err, DepthError::ParseFailure { what: "bid size", .. }));
    }
}
