//! Append-only cache file, one per date range
//!
//! Format: UTF-8 text, `\n`-terminated, comma-separated. The first line
//! is a header declaring the default pair universe:
//!
//! ```text
//! #,BTC-BUSD,ETH-BUSD
//! BTC-BUSD,16500.1,1.2,16500.2,0.8,...
//! ETH-BUSD,1200.5,10.0,1200.7,9.1,...
//! ```
//!
//! Body lines are self-describing (the pair name keys the line, not its
//! position) and carry 4 tokens per cached minute. Every body line must
//! hold the same number of minutes.

use crate::config::LoaderConfig;
use crate::data::{Market, Pair, TOKENS_PER_MINUTE};
use crate::{DepthError, Result};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

const HEADER_MARKER: &str = "#";

/// Handle to the cache file of one (market, date range)
#[derive(Debug, Clone)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    /// Derive the cache file location for a market and date range.
    ///
    /// With `market_scoped_paths` unset the market is left out of the
    /// path, which lets different markets share one file for a range.
    pub fn for_range(
        config: &LoaderConfig,
        market: Market,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let name = format!(
            "{}_{}_depth.csv",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
        let path = if config.market_scoped_paths {
            config.cache_dir.join(market.as_str()).join(name)
        } else {
            config.cache_dir.join(name)
        };
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Pairs declared by the header line, or empty when no header is present
    pub fn read_header_pairs(&self) -> Result<Vec<Pair>> {
        let file = File::open(&self.path)?;
        let mut first_line = String::new();
        BufReader::new(file).read_line(&mut first_line)?;

        let mut fields = first_line.trim_end().split(',');
        if fields.next() != Some(HEADER_MARKER) {
            return Ok(Vec::new());
        }
        Ok(fields.map(Pair::from).collect())
    }

    /// Read body lines into per-pair series.
    ///
    /// A non-empty `filter` restricts the result to those pairs and stops
    /// the scan early once all of them have been seen. Returns the series
    /// map and the history length in minutes shared by every line.
    pub fn read_body(&self, filter: &[Pair]) -> Result<(HashMap<Pair, Vec<String>>, usize)> {
        let file = File::open(&self.path)?;
        let wanted: HashSet<&Pair> = filter.iter().collect();

        let mut records: HashMap<Pair, Vec<String>> = HashMap::new();
        let mut history_minutes = 0usize;

        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.is_empty() || line.starts_with(HEADER_MARKER) {
                continue;
            }

            let mut fields = line.split(',');
            let pair = Pair::from(fields.next().unwrap_or_default());
            if !wanted.is_empty() && !wanted.contains(&pair) {
                continue;
            }

            let tokens: Vec<String> = fields.map(str::to_string).collect();
            if tokens.len() % TOKENS_PER_MINUTE != 0 {
                return Err(DepthError::CacheCorrupt {
                    pair: pair.to_string(),
                    reason: format!("{} tokens is not a whole number of records", tokens.len()),
                });
            }
            let minutes = tokens.len() / TOKENS_PER_MINUTE;
            if history_minutes == 0 {
                history_minutes = minutes;
            } else if !tokens.is_empty() && minutes != history_minutes {
                return Err(DepthError::CacheCorrupt {
                    pair: pair.to_string(),
                    reason: format!(
                        "history of {} minutes does not match the {} minutes seen before",
                        minutes, history_minutes
                    ),
                });
            }

            records.insert(pair, tokens);
            if !wanted.is_empty() && records.len() == wanted.len() {
                break;
            }
        }

        Ok((records, history_minutes))
    }

    /// Open the file for appending, creating it and its directory if needed
    pub fn open_append(&self) -> Result<CacheAppender> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        Ok(CacheAppender { file })
    }
}

/// Append-only writer over an open cache file.
///
/// Lines are never rewritten or deleted; appending a pair that already
/// has a body line would duplicate it, so callers must only append pairs
/// not yet present.
#[derive(Debug)]
pub struct CacheAppender {
    file: File,
}

impl CacheAppender {
    /// Write the header line declaring the pair universe.
    ///
    /// Meaningful only on a freshly created file.
    pub fn write_header(&mut self, pairs: &[Pair]) -> Result<()> {
        let names: Vec<&str> = pairs.iter().map(Pair::as_str).collect();
        let line = format!("{},{}\n", HEADER_MARKER, names.join(","));
        self.file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Append one pair's full series as a single body line
    pub fn append_pair(&mut self, pair: &Pair, series: &[String]) -> Result<()> {
        let line = format!("{},{}\n", pair, series.join(","));
        self.file.write_all(line.as_bytes())?;
        Ok(())
    }
}
