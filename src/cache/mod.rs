//! Flat-file depth cache

pub mod file;

pub use file::*;
