//! Ingestion error types.

use thiserror::Error;

/// Errors that can occur while fetching or parsing the rates source.
///
/// Row-level damage (an unparseable date or rate on an individual row) is
/// not an error: such rows are dropped during cleaning.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Transport failure: unreachable host, timeout, or protocol error.
    #[error("Rates fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success HTTP status.
    #[error("Rates source returned status {status}")]
    Status {
        /// The status the source answered with.
        status: reqwest::StatusCode,
    },

    /// No parse strategy produced a table with the required columns.
    #[error("Rates table must have columns: date_from, key_rate")]
    MissingColumns,
}
