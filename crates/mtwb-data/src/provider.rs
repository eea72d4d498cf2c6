//! The market-data seam and an in-memory implementation.

use crate::error::{DataError, Result};
use mtwb_scoring::{InstrumentKind, RawMetrics};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;

/// A ticker to evaluate and its instrument class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Listing {
    /// Ticker symbol
    pub symbol: String,
    /// Stock or ETF
    pub kind: InstrumentKind,
}

impl Listing {
    /// Create a listing; the symbol is trimmed and uppercased.
    pub fn new(symbol: impl AsRef<str>, kind: InstrumentKind) -> Self {
        Self {
            symbol: symbol.as_ref().trim().to_ascii_uppercase(),
            kind,
        }
    }

    /// A stock listing.
    pub fn stock(symbol: impl AsRef<str>) -> Self {
        Self::new(symbol, InstrumentKind::Stock)
    }

    /// An ETF listing.
    pub fn etf(symbol: impl AsRef<str>) -> Self {
        Self::new(symbol, InstrumentKind::Etf)
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.kind)
    }
}

/// Source of raw per-security metrics.
///
/// A failure concerns only the listing asked for; callers drop that security
/// and carry on with the rest of the universe.
pub trait MarketDataProvider {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the raw metrics of one listing.
    fn fetch_metrics(&self, listing: &Listing) -> impl Future<Output = Result<RawMetrics>> + Send;
}

/// Provider serving fixed records, with optional per-symbol failures.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    records: HashMap<String, RawMetrics>,
    failures: HashMap<String, String>,
}

impl InMemoryProvider {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider serving `records`, keyed by symbol.
    pub fn from_records(records: impl IntoIterator<Item = RawMetrics>) -> Self {
        let mut provider = Self::new();
        for record in records {
            provider.insert(record);
        }
        provider
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: RawMetrics) {
        self.records
            .insert(record.symbol.to_ascii_uppercase(), record);
    }

    /// Make every fetch of `symbol` fail with `reason`.
    pub fn fail(mut self, symbol: &str, reason: impl Into<String>) -> Self {
        self.failures
            .insert(symbol.to_ascii_uppercase(), reason.into());
        self
    }

    /// Number of records served.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are served.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn lookup(&self, listing: &Listing) -> Result<RawMetrics> {
        if listing.symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }
        if let Some(reason) = self.failures.get(&listing.symbol) {
            return Err(DataError::missing(&listing.symbol, reason.clone()));
        }
        let mut record = self
            .records
            .get(&listing.symbol)
            .cloned()
            .ok_or_else(|| DataError::missing(&listing.symbol, "no record"))?;
        record.symbol.clone_from(&listing.symbol);
        record.kind = listing.kind;
        Ok(record)
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch_metrics(&self, listing: &Listing) -> impl Future<Output = Result<RawMetrics>> + Send {
        let result = self.lookup(listing);
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtwb_scoring::Metric;

    #[test]
    fn test_listing_normalizes_symbol() {
        let listing = Listing::etf(" spy ");
        assert_eq!(listing.symbol, "SPY");
        assert_eq!(listing.to_string(), "SPY (ETF)");
    }

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let provider = InMemoryProvider::from_records([RawMetrics::new("ko", InstrumentKind::Stock)
            .with_metric(Metric::DividendYield, 0.03)])
        .fail("BAD", "delisted");

        let ko = provider.fetch_metrics(&Listing::stock("KO")).await.unwrap();
        assert_eq!(ko.metric(Metric::DividendYield), Some(0.03));

        let bad = provider.fetch_metrics(&Listing::stock("BAD")).await;
        assert!(matches!(bad, Err(DataError::MissingData { .. })));

        let unknown = provider.fetch_metrics(&Listing::stock("NOPE")).await;
        assert!(unknown.is_err());
    }

    #[tokio::test]
    async fn test_listing_kind_wins() {
        let provider = InMemoryProvider::from_records([RawMetrics::new("VTI", InstrumentKind::Stock)]);
        let vti = provider.fetch_metrics(&Listing::etf("VTI")).await.unwrap();
        assert_eq!(vti.kind, InstrumentKind::Etf);
    }
}
