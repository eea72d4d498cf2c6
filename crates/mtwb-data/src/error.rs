//! Fetch errors.
//!
//! A [`DataError`] only ever concerns one listing. The collection pipeline
//! records it against that listing and carries on with the rest.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Why a listing's metrics could not be produced.
#[derive(Debug, Error)]
pub enum DataError {
    /// The Yahoo client or chart API reported a failure
    #[error("quote service: {0}")]
    YahooApi(String),

    /// Transport-level failure
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} for {symbol}")]
    Http {
        /// Queried symbol
        symbol: String,
        /// Response status code
        status: u16,
    },

    /// Response body did not have the expected shape
    #[error("unexpected response: {0}")]
    Parse(String),

    /// Start of a history window after its end
    #[error("history window starts at {start}, after its end {end}")]
    InvalidDateRange {
        /// Window start, RFC 3339
        start: String,
        /// Window end, RFC 3339
        end: String,
    },

    /// The source has nothing usable for the symbol
    #[error("no data for {symbol}: {reason}")]
    MissingData {
        /// Queried symbol
        symbol: String,
        /// What was missing
        reason: String,
    },

    /// Building the quote frame failed
    #[error("quote frame: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Snapshot file could not be read or written
    #[error("snapshot: {0}")]
    Csv(#[from] csv::Error),

    /// Timestamp outside the representable range
    #[error("timestamp: {0}")]
    TimeConversion(String),

    /// Empty or malformed ticker
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Filesystem failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Shorthand for [`DataError::MissingData`].
    pub fn missing(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MissingData {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

impl From<yahoo_finance_api::YahooError> for DataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        Self::YahooApi(err.to_string())
    }
}
