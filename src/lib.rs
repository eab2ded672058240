//! Depth-Loader-RS: historical order-book depth loading and replay
//!
//! This crate downloads per-minute best bid/ask depth records from the
//! public [Crypto Chassis](https://api.cryptochassis.com) archive, caches
//! them in an append-only flat file per date range, and replays the
//! cached series minute by minute.
//!
//! # Features
//!
//! - **Remote fetching**: signed day-file resolution with bounded retry
//!   on rate limits
//! - **Minute normalization**: per-second samples collapsed to a fixed
//!   1-minute cadence with carry-forward gap filling
//! - **Flat-file caching**: one self-describing line per pair, appended
//!   as new pairs are fetched
//! - **Replay cursor**: sequential minute-by-minute access to the loaded
//!   series
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use depth_loader_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut store = DepthStore::new(Market::Binance, LoaderConfig::default());
//!
//!     let start = NaiveDate::from_ymd_opt(2022, 11, 24).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2022, 11, 25).unwrap();
//!     store.load(&[Pair::from("BTC-BUSD")], start, end).await?;
//!
//!     let depth = store.get_depth(&Pair::from("BTC-BUSD"))?;
//!     println!("spread: {:.4}%", depth.spread_percentage() * 100.0);
//!     store.tick();
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod exchange;
pub mod store;

// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::*;
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::exchange::*;
    pub use crate::store::*;

    pub use crate::error::DepthError;
    pub use crate::Result;
}

pub use error::DepthError;

/// Result type alias
pub type Result<T> = std::result::Result<T, DepthError>;
