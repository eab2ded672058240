//! Depth store: cache reconciliation and minute replay

use crate::cache::CacheFile;
use crate::config::LoaderConfig;
use crate::data::{DepthRecord, Market, Pair, TOKENS_PER_MINUTE};
use crate::exchange::{ChassisFetcher, DepthSource};
use crate::{DepthError, Result};
use chrono::{Duration, NaiveDate};
use futures::{stream, StreamExt, TryStreamExt};
use std::collections::HashMap;
use tracing::{debug, info};

// On-file history may drift from the requested range by strictly less
// than one day of minutes before it counts as a range mismatch.
const RANGE_TOLERANCE_MINUTES: i64 = 1400;

/// In-memory depth store over one market.
///
/// Owns the per-pair series map, the on-disk cache reconciliation, and a
/// single replay cursor shared by all pairs. One store per caller
/// session; constructing a new store resets the cursor.
pub struct DepthStore<S: DepthSource = ChassisFetcher> {
    market: Market,
    config: LoaderConfig,
    source: S,
    records: HashMap<Pair, Vec<String>>,
    cursor: usize,
}

impl DepthStore<ChassisFetcher> {
    /// Store backed by the Crypto Chassis archive
    pub fn new(market: Market, config: LoaderConfig) -> Self {
        let source = ChassisFetcher::new(&config);
        Self::with_source(market, config, source)
    }
}

impl<S: DepthSource> DepthStore<S> {
    /// Store backed by a custom day source
    pub fn with_source(market: Market, config: LoaderConfig, source: S) -> Self {
        Self {
            market,
            config,
            source,
            records: HashMap::new(),
            cursor: 0,
        }
    }

    /// Market this store serves
    pub fn market(&self) -> Market {
        self.market
    }

    /// Series loaded so far, keyed by pair
    pub fn records(&self) -> &HashMap<Pair, Vec<String>> {
        &self.records
    }

    /// Load depth series for `pairs` over `[start, end)`.
    ///
    /// Pairs already cached, whether in memory or in the cache file, are
    /// not fetched again; newly fetched pairs are appended to the file. An
    /// empty `pairs` slice targets the configured default universe. A
    /// pair for which the remote has no data at all is skipped without
    /// being persisted, so later calls will attempt it again.
    ///
    /// The returned map is cumulative: it holds every pair loaded by this
    /// store so far, not only the pairs of this call.
    pub async fn load(
        &mut self,
        pairs: &[Pair],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<&HashMap<Pair, Vec<String>>> {
        let cache = CacheFile::for_range(&self.config, self.market, start, end);
        let expected_minutes = (end - start).num_minutes();
        let file_exists = cache.exists();

        let pairs_to_load: Vec<Pair> = if file_exists {
            let (cached, file_minutes) = cache.read_body(pairs)?;
            if file_minutes != 0
                && (file_minutes as i64 - expected_minutes).abs() >= RANGE_TOLERANCE_MINUTES
            {
                return Err(DepthError::RangeMismatch {
                    expected: expected_minutes,
                    found: file_minutes as i64,
                });
            }
            for (pair, series) in cached {
                self.records.entry(pair).or_insert(series);
            }

            let requested = if pairs.is_empty() {
                cache.read_header_pairs()?
            } else {
                pairs.to_vec()
            };
            let missing: Vec<Pair> = requested
                .into_iter()
                .filter(|pair| !self.records.contains_key(pair))
                .collect();
            if !missing.is_empty() {
                info!(
                    "Missing pairs will be fetched and appended to {}",
                    cache.path().display()
                );
            }
            missing
        } else if pairs.is_empty() {
            self.config.default_pairs.clone()
        } else {
            pairs.to_vec()
        };

        let mut appender = cache.open_append()?;
        if !file_exists {
            appender.write_header(&self.config.default_pairs)?;
        }

        for pair in &pairs_to_load {
            let days = days_in_range(start, end);
            info!("Downloading depth for {} over {} day(s)", pair, days.len());

            let source = &self.source;
            let market = self.market;
            let per_day: Vec<Vec<String>> = stream::iter(days)
                .map(|date| {
                    debug!("Downloading depth for {} {}", pair, date);
                    source.fetch_day(market, pair, date)
                })
                .buffered(self.config.fetch_concurrency.max(1))
                .try_collect()
                .await?;

            let series = per_day.concat();
            if series.is_empty() {
                debug!("No depth data for {} in this range, skipping", pair);
                continue;
            }

            appender.append_pair(pair, &series)?;
            self.records.insert(pair.clone(), series);
        }

        if !pairs_to_load.is_empty() {
            info!("Depth data written to {}", cache.path().display());
        }

        Ok(&self.records)
    }

    /// Advance the shared replay cursor by one minute.
    ///
    /// No bound is enforced here; running past the end of a series is
    /// reported by the next [`DepthStore::get_depth`] call.
    pub fn tick(&mut self) {
        self.cursor += TOKENS_PER_MINUTE;
    }

    /// Depth record for `pair` at the current cursor minute
    pub fn get_depth(&self, pair: &Pair) -> Result<DepthRecord> {
        let series = self
            .records
            .get(pair)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if self.cursor + TOKENS_PER_MINUTE > series.len() {
            return Err(DepthError::CursorOutOfRange {
                pair: pair.clone(),
                offset: self.cursor,
                len: series.len(),
            });
        }
        DepthRecord::from_tokens(&series[self.cursor..self.cursor + TOKENS_PER_MINUTE])
    }
}

fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = start;
    while day < end {
        days.push(day);
        day = day + Duration::days(1);
    }
    days
}
