//! Yahoo Finance data providers.

pub mod fundamentals;
pub mod quotes;

pub use fundamentals::{FundamentalData, YahooFundamentalsProvider, parse_quote_summary};
pub use quotes::{PriceSummary, YahooQuoteProvider};

use crate::error::Result;
use crate::provider::{Listing, MarketDataProvider};
use mtwb_scoring::RawMetrics;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Market-data provider backed by Yahoo Finance.
///
/// Fundamentals come from the quote summary. When the summary lacks the
/// current price or the 52-week change, a year of quote history fills them.
#[derive(Debug)]
pub struct YahooProvider {
    fundamentals: YahooFundamentalsProvider,
    quotes: YahooQuoteProvider,
}

impl YahooProvider {
    /// Create a provider with default rate limiting.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client or the quote connector cannot be built.
    pub fn new() -> Result<Self> {
        Ok(Self {
            fundamentals: YahooFundamentalsProvider::new()?,
            quotes: YahooQuoteProvider::new()?,
        })
    }

    /// Create a provider with a custom delay after each request.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client or the quote connector cannot be built.
    pub fn with_rate_limit(delay: Duration) -> Result<Self> {
        Ok(Self {
            fundamentals: YahooFundamentalsProvider::with_rate_limit(delay)?,
            quotes: YahooQuoteProvider::with_rate_limit(delay)?,
        })
    }

    async fn fetch(&self, listing: &Listing) -> Result<RawMetrics> {
        let data = self.fundamentals.fetch_fundamentals(&listing.symbol).await?;
        let mut raw = to_raw_metrics(listing, data);

        if raw.current_price.is_none() || raw.fifty_two_week_change.is_none() {
            match self.quotes.fetch_price_summary(&listing.symbol).await {
                Ok(summary) => {
                    raw.current_price.get_or_insert(summary.last_close);
                    if raw.fifty_two_week_change.is_none() {
                        raw.fifty_two_week_change = summary.change;
                    }
                }
                Err(e) => debug!(symbol = %listing.symbol, error = %e, "quote history unavailable"),
            }
        }

        Ok(raw)
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch_metrics(&self, listing: &Listing) -> impl Future<Output = Result<RawMetrics>> + Send {
        self.fetch(listing)
    }
}

/// Map Yahoo fundamentals onto the scorer's record. The listing decides the
/// instrument kind.
pub fn to_raw_metrics(listing: &Listing, data: FundamentalData) -> RawMetrics {
    RawMetrics {
        symbol: listing.symbol.clone(),
        kind: listing.kind,
        sector: data.sector,
        pe_ratio: data.trailing_pe,
        beta: data.beta,
        dividend_yield: data.dividend_yield,
        profit_margin: data.profit_margin,
        return_on_equity: data.return_on_equity,
        fifty_two_week_change: data.fifty_two_week_change,
        market_cap: data.market_cap,
        current_price: data.current_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtwb_scoring::{InstrumentKind, Metric};

    #[test]
    fn test_to_raw_metrics() {
        let data = FundamentalData {
            symbol: "ICLN".to_string(),
            quote_type: Some("ETF".to_string()),
            trailing_pe: Some(-4.0),
            dividend_yield: Some(0.017),
            ..FundamentalData::default()
        };
        let raw = to_raw_metrics(&Listing::etf("ICLN"), data);
        assert_eq!(raw.kind, InstrumentKind::Etf);
        assert_eq!(raw.stored(Metric::PriceToEarnings), Some(-4.0));
        assert_eq!(raw.metric(Metric::PriceToEarnings), None);
        assert_eq!(raw.metric(Metric::Beta), None);
    }
}
