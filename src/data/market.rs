//! Trading venue identifiers

use crate::{DepthError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Venues served by the Crypto Chassis archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Market {
    Bitfinex,
    Bitmex,
    Binance,
    BinanceCoinFutures,
    BinanceUsdsFutures,
    BinanceUs,
    Bitstamp,
    Coinbase,
    Deribit,
    Ftx,
    FtxUs,
    Gateio,
    GateioPerpetualFutures,
    Gemini,
    Huobi,
    HuobiCoinSwap,
    HuobiUsdtSwap,
    Kucoin,
    Kraken,
    KrakenFutures,
    Okex,
}

impl Market {
    /// Venue name as used in API paths and cache directories
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bitfinex => "bitfinex",
            Self::Bitmex => "bitmex",
            Self::Binance => "binance",
            Self::BinanceCoinFutures => "binance-coin-futures",
            Self::BinanceUsdsFutures => "binance-usds-futures",
            Self::BinanceUs => "binance-us",
            Self::Bitstamp => "bitstamp",
            Self::Coinbase => "coinbase",
            Self::Deribit => "deribit",
            Self::Ftx => "ftx",
            Self::FtxUs => "ftx-us",
            Self::Gateio => "gateio",
            Self::GateioPerpetualFutures => "gateio-perpetual-futures",
            Self::Gemini => "gemini",
            Self::Huobi => "huobi",
            Self::HuobiCoinSwap => "huobi-coin-swap",
            Self::HuobiUsdtSwap => "huobi-usdt-swap",
            Self::Kucoin => "kucoin",
            Self::Kraken => "kraken",
            Self::KrakenFutures => "kraken-futures",
            Self::Okex => "okex",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = DepthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bitfinex" => Ok(Self::Bitfinex),
            "bitmex" => Ok(Self::Bitmex),
            "binance" => Ok(Self::Binance),
            "binance-coin-futures" => Ok(Self::BinanceCoinFutures),
            "binance-usds-futures" => Ok(Self::BinanceUsdsFutures),
            "binance-us" => Ok(Self::BinanceUs),
            "bitstamp" => Ok(Self::Bitstamp),
            "coinbase" => Ok(Self::Coinbase),
            "deribit" => Ok(Self::Deribit),
            "ftx" => Ok(Self::Ftx),
            "ftx-us" => Ok(Self::FtxUs),
            "gateio" => Ok(Self::Gateio),
            "gateio-perpetual-futures" => Ok(Self::GateioPerpetualFutures),
            "gemini" => Ok(Self::Gemini),
            "huobi" => Ok(Self::Huobi),
            "huobi-coin-swap" => Ok(Self::HuobiCoinSwap),
            "huobi-usdt-swap" => Ok(Self::HuobiUsdtSwap),
            "kucoin" => Ok(Self::Kucoin),
            "kraken" => Ok(Self::Kraken),
            "kraken-futures" => Ok(Self::KrakenFutures),
            "okex" => Ok(Self::Okex),
            _ => Err(DepthError::ParseFailure {
                what: "market",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_round_trip() {
        for market in [Market::Binance, Market::BinanceUsdsFutures, Market::KrakenFutures] {
            assert_eq!(market.as_str().parse::<Market>().unwrap(), market);
        }
    }

    #[test]
    fn test_unknown_market() {
        assert!("nasdaq".parse::<Market>().is_err());
    }
}
