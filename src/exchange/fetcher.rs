//! Day-level fetching and minute normalization

use crate::config::LoaderConfig;
use crate::data::{Market, Pair, MINUTES_PER_DAY, TOKENS_PER_MINUTE};
use crate::exchange::ChassisClient;
use crate::{DepthError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::debug;

// Column-name marker of the schema row in raw day files.
const TIME_COLUMN_MARKER: &str = "time_seconds";

/// Source of per-day depth series, the seam between store and network
#[async_trait]
pub trait DepthSource: Send + Sync {
    /// Fetch one day of per-minute depth tokens for a pair.
    ///
    /// A full day is exactly `4 * 1440` tokens; an empty vec means the
    /// remote published no data for that day.
    async fn fetch_day(&self, market: Market, pair: &Pair, date: NaiveDate) -> Result<Vec<String>>;
}

/// Fetches and normalizes day files from the Crypto Chassis archive
#[derive(Debug, Clone)]
pub struct ChassisFetcher {
    client: ChassisClient,
    http: reqwest::Client,
}

impl ChassisFetcher {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            client: ChassisClient::new(config),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DepthSource for ChassisFetcher {
    async fn fetch_day(&self, market: Market, pair: &Pair, date: NaiveDate) -> Result<Vec<String>> {
        let url = self.client.resolve_download_url(market, pair, date).await?;

        debug!("Downloading day file for {} {}", pair, date);
        let compressed = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| DepthError::Http {
                url: url.clone(),
                source,
            })?
            .bytes()
            .await
            .map_err(|source| DepthError::Http {
                url: url.clone(),
                source,
            })?;

        let tokens = collapse_day(GzDecoder::new(compressed.as_ref()))?;
        validate_day_length(pair, date, tokens)
    }
}

/// Collapse a day's per-second rows down to one record per minute.
///
/// Rows arrive in ascending time order. Only rows landing exactly on a
/// minute boundary are kept; any sampling gap is bridged by carrying the
/// previous minute's record forward, so no minute is ever missing from
/// the output.
pub(crate) fn collapse_day<R: Read>(raw: R) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw);

    let mut tokens: Vec<String> = Vec::new();
    let mut prev_minute: Option<(i64, [String; TOKENS_PER_MINUTE])> = None;

    for row in reader.records() {
        let row = row.map_err(|err| DepthError::ParseFailure {
            what: "csv record",
            value: err.to_string(),
        })?;
        let Some(first) = row.get(0) else { continue };
        if first == TIME_COLUMN_MARKER {
            continue;
        }

        let seconds: i64 = first.parse().map_err(|_| DepthError::ParseFailure {
            what: "epoch seconds",
            value: first.to_string(),
        })?;

        // carry the last minute forward across any sampling gap
        if let Some((prev_seconds, prev_record)) = &mut prev_minute {
            if seconds - *prev_seconds > 1 {
                while *prev_seconds + 60 < seconds {
                    *prev_seconds += 60;
                    tokens.extend(prev_record.iter().cloned());
                }
            }
        }

        if seconds % 60 == 0 {
            let (bid_price, bid_size) = split_price_size(row.get(1))?;
            let (ask_price, ask_size) = split_price_size(row.get(2))?;
            let record = [bid_price, bid_size, ask_price, ask_size];
            tokens.extend(record.iter().cloned());
            prev_minute = Some((seconds, record));
        }
    }

    Ok(tokens)
}

fn split_price_size(field: Option<&str>) -> Result<(String, String)> {
    let field = field.unwrap_or_default();
    field
        .split_once('_')
        .map(|(price, size)| (price.to_string(), size.to_string()))
        .ok_or_else(|| DepthError::ParseFailure {
            what: "price_size token",
            value: field.to_string(),
        })
}

fn validate_day_length(pair: &Pair, date: NaiveDate, tokens: Vec<String>) -> Result<Vec<String>> {
    let expected = TOKENS_PER_MINUTE * MINUTES_PER_DAY;
    if tokens.is_empty() || tokens.len() == expected {
        Ok(tokens)
    } else {
        Err(DepthError::IncompleteDay {
            pair: pair.clone(),
            date,
            tokens: tokens.len(),
            expected,
        })
    }
}
