//! Concurrent collection of a whole universe.
//!
//! Collection is the first phase of an evaluation: every listing is fetched
//! before anything is normalized, because normalization needs the extremes
//! of the complete universe.

use crate::error::DataError;
use crate::provider::{Listing, MarketDataProvider};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use mtwb_scoring::RawMetrics;
use tracing::{info, warn};

/// Default number of concurrent fetches.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// A listing that could not be fetched.
#[derive(Debug)]
pub struct FetchFailure {
    /// The listing
    pub listing: Listing,
    /// Why it failed
    pub error: DataError,
}

/// Outcome of collecting a universe.
#[derive(Debug, Default)]
pub struct Collection {
    /// Fetched records, in listing order
    pub records: Vec<RawMetrics>,
    /// Listings that failed, in listing order
    pub failures: Vec<FetchFailure>,
}

impl Collection {
    /// Number of listings attempted.
    pub fn attempted(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Fetch every listing with at most `concurrency` requests in flight.
///
/// A failed listing is logged and reported in [`Collection::failures`]; it
/// never aborts the batch. Records come back in listing order whatever the
/// completion order, so ties in the final ranking stay deterministic.
pub async fn collect_universe<P>(
    provider: &P,
    listings: &[Listing],
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Collection
where
    P: MarketDataProvider + Sync,
{
    if let Some(pb) = progress {
        pb.set_length(listings.len() as u64);
        pb.set_message(format!(
            "Fetching {} listings from {} ({} concurrent)...",
            listings.len(),
            provider.name(),
            concurrency.max(1)
        ));
    }

    let mut outcomes: Vec<(usize, Result<RawMetrics, DataError>)> = stream::iter(listings.iter().enumerate())
        .map(|(index, listing)| async move { (index, provider.fetch_metrics(listing).await) })
        .buffer_unordered(concurrency.max(1))
        .inspect(|(index, outcome)| {
            if let Err(e) = outcome {
                let symbol = &listings[*index].symbol;
                match progress {
                    Some(pb) => pb.suspend(|| warn!(%symbol, error = %e, "fetch failed")),
                    None => warn!(%symbol, error = %e, "fetch failed"),
                }
            }
            if let Some(pb) = progress {
                pb.inc(1);
            }
        })
        .collect()
        .await;

    outcomes.sort_by_key(|(index, _)| *index);

    let mut collection = Collection::default();
    for (index, outcome) in outcomes {
        match outcome {
            Ok(record) => collection.records.push(record),
            Err(error) => collection.failures.push(FetchFailure {
                listing: listings[index].clone(),
                error,
            }),
        }
    }

    info!(
        provider = provider.name(),
        fetched = collection.records.len(),
        failed = collection.failures.len(),
        "universe collected"
    );
    collection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;
    use mtwb_scoring::InstrumentKind;

    #[tokio::test]
    async fn test_preserves_listing_order() {
        let symbols = ["E", "D", "C", "B", "A"];
        let provider = InMemoryProvider::from_records(
            symbols.iter().map(|s| RawMetrics::new(*s, InstrumentKind::Stock)),
        );
        let listings: Vec<_> = symbols.iter().map(Listing::stock).collect();

        let collection = collect_universe(&provider, &listings, 3, None).await;
        let fetched: Vec<_> = collection.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(fetched, symbols);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_runs() {
        let provider = InMemoryProvider::from_records([RawMetrics::new("A", InstrumentKind::Stock)]);
        let collection = collect_universe(&provider, &[Listing::stock("A")], 0, None).await;
        assert_eq!(collection.records.len(), 1);
    }
}
