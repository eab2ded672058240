//! Error taxonomy for depth loading

use crate::data::Pair;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the loader.
///
/// Each variant marks a distinct failure kind so callers can decide a
/// retry-vs-abort policy per kind instead of treating every failure the
/// same way.
#[derive(Debug, Error)]
pub enum DepthError {
    /// The metadata endpoint kept rate-limiting until the retry budget ran out
    #[error("remote API still rate-limited after {attempts} attempts: {url}")]
    RemoteUnavailable { url: String, attempts: u32 },

    /// The metadata endpoint returned a body that is neither valid JSON nor a rate-limit notice
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// The metadata document carried no download URL for the requested day
    #[error("no download URL published for {pair} on {date}")]
    NoDownloadUrl { pair: Pair, date: NaiveDate },

    /// A cache file body line violates the on-disk invariants
    #[error("cache file corrupted at pair {pair}: {reason}")]
    CacheCorrupt { pair: String, reason: String },

    /// The cached history length disagrees with the requested date range
    #[error("cached history of {found} minutes does not match the requested {expected}-minute range")]
    RangeMismatch { expected: i64, found: i64 },

    /// A non-empty day reduced to something other than a full day of minutes
    #[error("{pair} on {date} reduced to {tokens} tokens, expected {expected} for a full day")]
    IncompleteDay {
        pair: Pair,
        date: NaiveDate,
        tokens: usize,
        expected: usize,
    },

    /// The replay cursor points at or beyond the end of a pair's series
    #[error("cursor offset {offset} is past the end of the {pair} series ({len} tokens)")]
    CursorOutOfRange { pair: Pair, offset: usize, len: usize },

    /// A token that should be numeric (or otherwise well-formed) is not
    #[error("failed to parse {what} value '{value}'")]
    ParseFailure { what: &'static str, value: String },

    /// Transport-level HTTP failure
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Filesystem failure around the cache file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
