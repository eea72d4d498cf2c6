//! Offline metrics stored in a CSV file.
//!
//! One row per security, with a header naming the [`RawMetrics`] fields:
//!
//! ```text
//! symbol,kind,sector,pe_ratio,beta,dividend_yield,profit_margin,return_on_equity,fifty_two_week_change,market_cap,current_price
//! AAPL,stock,Technology,31.2,1.24,0.0044,0.24,1.57,0.18,3.4e12,227.5
//! SPY,etf,,,1.0,0.013,,,0.21,,480.1
//! ```
//!
//! Empty cells are missing values.

use crate::error::{DataError, Result};
use crate::provider::{Listing, MarketDataProvider};
use mtwb_scoring::RawMetrics;
use std::collections::HashMap;
use std::future::Future;
use std::io::{Read, Write};
use std::path::Path;
use tracing::info;

/// Provider reading every record from a CSV snapshot up front.
#[derive(Debug, Clone, Default)]
pub struct CsvProvider {
    records: HashMap<String, RawMetrics>,
    order: Vec<String>,
}

impl CsvProvider {
    /// Load a snapshot from a file.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Io`] or [`DataError::Csv`] on a bad file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let provider = Self::from_reader(file)?;
        info!(path = %path.display(), records = provider.len(), "loaded metrics snapshot");
        Ok(provider)
    }

    /// Load a snapshot from any reader.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Csv`] when a row does not parse.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut provider = Self::default();
        for row in csv_reader.deserialize::<RawMetrics>() {
            let mut record = row?;
            record.symbol = record.symbol.to_ascii_uppercase();
            if provider.records.insert(record.symbol.clone(), record.clone()).is_none() {
                provider.order.push(record.symbol);
            }
        }
        Ok(provider)
    }

    /// Listings in file order.
    pub fn listings(&self) -> Vec<Listing> {
        self.order
            .iter()
            .filter_map(|symbol| self.records.get(symbol))
            .map(|r| Listing::new(&r.symbol, r.kind))
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn lookup(&self, listing: &Listing) -> Result<RawMetrics> {
        let mut record = self
            .records
            .get(&listing.symbol)
            .cloned()
            .ok_or_else(|| DataError::missing(&listing.symbol, "not in snapshot"))?;
        record.kind = listing.kind;
        Ok(record)
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_metrics(&self, listing: &Listing) -> impl Future<Output = Result<RawMetrics>> + Send {
        let result = self.lookup(listing);
        async move { result }
    }
}

/// Write records as a CSV snapshot readable by [`CsvProvider`].
///
/// # Errors
///
/// Returns [`DataError::Csv`] or [`DataError::Io`] on write failure.
pub fn write_snapshot<'a>(
    writer: impl Write,
    records: impl IntoIterator<Item = &'a RawMetrics>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to a snapshot file.
///
/// # Errors
///
/// As [`write_snapshot`].
pub fn write_snapshot_file<'a>(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = &'a RawMetrics>,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_snapshot(file, records)
}
