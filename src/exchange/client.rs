//! Crypto Chassis metadata client

use crate::config::LoaderConfig;
use crate::data::{Market, Pair};
use crate::{DepthError, Result};
use chrono::NaiveDate;
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

// Literal body the API serves instead of JSON while throttling.
const RATE_LIMIT_MARKER: &str = "Too many requests, please try again later.";

/// One signed, time-limited download location
#[derive(Debug, Clone, Deserialize)]
struct UrlWindow {
    url: String,
}

/// Metadata document for a market/pair/day request
#[derive(Debug, Clone, Deserialize)]
struct DepthMetadata {
    urls: Vec<UrlWindow>,
}

/// Client for the market-depth metadata endpoint
#[derive(Debug, Clone)]
pub struct ChassisClient {
    http: reqwest::Client,
    api_base_url: String,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl ChassisClient {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base_url: config.api_base_url.clone(),
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        }
    }

    /// Resolve the signed download URL for one day of raw depth data.
    ///
    /// Rate-limited responses are retried with exponential backoff until
    /// the attempt budget runs out; any other non-JSON body is treated as
    /// malformed and fails immediately.
    pub async fn resolve_download_url(
        &self,
        market: Market,
        pair: &Pair,
        date: NaiveDate,
    ) -> Result<String> {
        let url = format!(
            "{}/market-depth/{}/{}?startTime={}",
            self.api_base_url,
            market,
            pair,
            date.format("%Y-%m-%d")
        );

        for attempt in 0..=self.max_retries {
            let response = self.http.get(&url).send().await.map_err(|source| {
                DepthError::Http {
                    url: url.clone(),
                    source,
                }
            })?;
            let body = response.text().await.map_err(|source| DepthError::Http {
                url: url.clone(),
                source,
            })?;

            match serde_json::from_str::<DepthMetadata>(&body) {
                Ok(metadata) => {
                    return metadata
                        .urls
                        .into_iter()
                        .next()
                        .map(|window| window.url)
                        .ok_or_else(|| DepthError::NoDownloadUrl {
                            pair: pair.clone(),
                            date,
                        });
                }
                Err(_) if body.contains(RATE_LIMIT_MARKER) => {
                    if attempt == self.max_retries {
                        break;
                    }
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        "Rate limited resolving {} for {}, retrying in {:?} (attempt {}/{})",
                        pair,
                        date,
                        delay,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    return Err(DepthError::MalformedResponse {
                        url,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Err(DepthError::RemoteUnavailable {
            url,
            attempts: self.max_retries + 1,
        })
    }

    /// Exponential backoff with jitter, capped to keep the shift sane
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.retry_backoff_ms.saturating_mul(1 << attempt.min(10));
        let jitter = rand::thread_rng().gen_range(0..=self.retry_backoff_ms.max(1) / 2);
        Duration::from_millis(base.saturating_add(jitter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_parsing() {
        let body = r#"{
            "urls": [
                {
                    "startTime": {"seconds": 1633824000, "iso": "2021-10-10T00:00:00.000Z"},
                    "endTime": {"seconds": 1633910400, "iso": "2021-10-11T00:00:00.000Z"},
                    "url": "https://example.com/1-1633824000.csv.gz?sig=abc"
                }
            ],
            "expiration": "300 seconds"
        }"#;
        let metadata: DepthMetadata = serde_json::from_str(body).unwrap();
        assert_eq!(metadata.urls.len(), 1);
        assert!(metadata.urls[0].url.ends_with("csv.gz?sig=abc"));
    }

    #[test]
    fn test_rate_limit_body_is_not_json() {
        assert!(serde_json::from_str::<DepthMetadata>(RATE_LIMIT_MARKER).is_err());
    }

    #[test]
    fn test_backoff_grows() {
        let client = ChassisClient::new(&LoaderConfig {
            retry_backoff_ms: 100,
            ..LoaderConfig::default()
        });
        assert!(client.backoff_delay(0) >= Duration::from_millis(100));
        assert!(client.backoff_delay(3) >= Duration::from_millis(800));
        assert!(client.backoff_delay(3) <= Duration::from_millis(850));
    }
}
