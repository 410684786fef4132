//! Ingestion of the central-bank key-rate schedule.
//!
//! Fetches a loosely structured rates table (CSV, TSV, or a JSON array of
//! records) from a configured URL, cleans it defensively, and caches the
//! resulting [`calc_core::RateSchedule`] snapshot behind a time-based
//! staleness policy.

pub mod error;
pub mod parse;
pub mod provider;

pub use error::FeedError;
pub use provider::{RatesProvider, DEFAULT_FETCH_TIMEOUT, DEFAULT_REFRESH_INTERVAL};
