//! Loader configuration

use crate::data::Pair;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Crypto Chassis REST endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.cryptochassis.com/v1";

// Pairs known to be available on the archive, used when a load names none.
const DEFAULT_PAIRS: [&str; 12] = [
    "ADA-BUSD",
    "BCH-BUSD",
    "BNB-BUSD",
    "BTC-BUSD",
    "DOGE-BUSD",
    "DOT-BUSD",
    "EOS-BUSD",
    "ETH-BUSD",
    "LTC-BUSD",
    "SOL-BUSD",
    "UNI-BUSD",
    "XRP-BUSD",
];

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Directory holding cache files
    pub cache_dir: PathBuf,
    /// Place cache files under a per-market subdirectory
    pub market_scoped_paths: bool,
    /// Base URL of the metadata API
    pub api_base_url: String,
    /// Maximum in-flight day downloads per pair
    pub fetch_concurrency: usize,
    /// Retry attempts for a rate-limited metadata request
    pub max_retries: u32,
    /// Base delay for exponential retry backoff
    pub retry_backoff_ms: u64,
    /// Pair universe used when a load names no pairs
    pub default_pairs: Vec<Pair>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("data"),
            market_scoped_paths: true,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            fetch_concurrency: 30,
            max_retries: 5,
            retry_backoff_ms: 500,
            default_pairs: DEFAULT_PAIRS.iter().copied().map(Pair::from).collect(),
        }
    }
}

impl LoaderConfig {
    /// Build a configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();
        Self {
            cache_dir: std::env::var("DEPTH_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            market_scoped_paths: env_parsed("DEPTH_MARKET_SCOPED_PATHS")
                .unwrap_or(defaults.market_scoped_paths),
            api_base_url: std::env::var("DEPTH_API_BASE_URL").unwrap_or(defaults.api_base_url),
            fetch_concurrency: env_parsed("DEPTH_FETCH_CONCURRENCY")
                .unwrap_or(defaults.fetch_concurrency),
            max_retries: env_parsed("DEPTH_MAX_RETRIES").unwrap_or(defaults.max_retries),
            retry_backoff_ms: env_parsed("DEPTH_RETRY_BACKOFF_MS")
                .unwrap_or(defaults.retry_backoff_ms),
            default_pairs: defaults.default_pairs,
        }
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.cache_dir, PathBuf::from("data"));
        assert!(config.market_scoped_paths);
        assert_eq!(config.fetch_concurrency, 30);
        assert_eq!(config.default_pairs.len(), 12);
        assert!(config.default_pairs.contains(&Pair::from("BTC-BUSD")));
        assert!(config.default_pairs.iter().all(Pair::is_valid));
    }
}
