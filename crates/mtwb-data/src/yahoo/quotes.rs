//! Quote history from Yahoo Finance.
//!
//! History is only used to fill the current price and the 52-week change
//! when the quote summary does not carry them.

use crate::error::{DataError, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use polars::prelude::*;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    connector: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Create a quote provider with default rate limiting (250ms per request).
    ///
    /// # Errors
    ///
    /// Returns [`DataError::YahooApi`] if the connector cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(250))
    }

    /// Create a quote provider with custom rate limiting.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::YahooApi`] if the connector cannot be built.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            connector: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Daily closes of `symbol` between `start` and `end`, oldest first.
    ///
    /// The frame has the columns `symbol`, `date`, `close` and
    /// `adjusted_close`.
    pub async fn fetch_history(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DataFrame> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }
        if end < start {
            return Err(DataError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        let history = self
            .connector
            .get_quote_history(symbol, offset(start)?, offset(end)?)
            .await?;
        let bars = history
            .quotes()
            .map_err(|e| DataError::YahooApi(format!("{symbol}: {e}")))?;
        sleep(self.rate_limit_delay).await;

        if bars.is_empty() {
            return Err(DataError::missing(symbol, "empty price history"));
        }
        let (mut timestamps, mut closes, mut adjusted) = (
            Vec::with_capacity(bars.len()),
            Vec::with_capacity(bars.len()),
            Vec::with_capacity(bars.len()),
        );
        for bar in &bars {
            timestamps.push(bar.timestamp as i64);
            closes.push(bar.close);
            adjusted.push(bar.adjclose);
        }
        quotes_frame(symbol, timestamps, closes, adjusted)
    }

    /// Last close and 52-week change of `symbol`.
    pub async fn fetch_price_summary(&self, symbol: &str) -> Result<PriceSummary> {
        let end = Utc::now();
        let history = self
            .fetch_history(symbol, end - ChronoDuration::days(365), end)
            .await?;
        PriceSummary::from_quotes(symbol, &history)
    }
}

fn offset(at: DateTime<Utc>) -> Result<time::OffsetDateTime> {
    time::OffsetDateTime::from_unix_timestamp(at.timestamp())
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}

/// Build the quotes frame from raw columns.
pub(crate) fn quotes_frame(
    symbol: &str,
    timestamps: Vec<i64>,
    closes: Vec<f64>,
    adj_closes: Vec<f64>,
) -> Result<DataFrame> {
    let height = timestamps.len();
    let df = DataFrame::new(vec![
        Series::new("symbol".into(), vec![symbol; height]).into(),
        Series::new("timestamp".into(), timestamps).into(),
        Series::new("close".into(), closes).into(),
        Series::new("adjusted_close".into(), adj_closes).into(),
    ])?;

    let df = df
        .lazy()
        .with_column(
            (col("timestamp") * lit(1_000_000_000))
                .cast(DataType::Datetime(TimeUnit::Nanoseconds, None))
                .cast(DataType::Date)
                .alias("date"),
        )
        .sort(["timestamp"], SortMultipleOptions::default())
        .select([
            col("symbol"),
            col("date"),
            col("close"),
            col("adjusted_close"),
        ])
        .collect()?;

    Ok(df)
}

/// Last price and trailing change derived from a quotes frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    /// Last close
    pub last_close: f64,
    /// Change of the adjusted close from first to last row, as a fraction
    pub change: Option<f64>,
}

impl PriceSummary {
    /// Summarize a date-sorted quotes frame.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingData`] when the frame has no usable close.
    pub fn from_quotes(symbol: &str, quotes: &DataFrame) -> Result<Self> {
        let closes = quotes.column("close")?.as_materialized_series().f64()?;
        let last_close = closes
            .into_iter()
            .flatten()
            .filter(|c| c.is_finite())
            .last()
            .ok_or_else(|| DataError::missing(symbol, "no close prices"))?;

        let adjusted: Vec<f64> = quotes
            .column("adjusted_close")?
            .as_materialized_series()
            .f64()?
            .into_iter()
            .flatten()
            .filter(|c| c.is_finite() && *c > 0.0)
            .collect();

        let change = match (adjusted.first(), adjusted.last()) {
            (Some(first), Some(last)) if adjusted.len() > 1 => Some(last / first - 1.0),
            _ => None,
        };

        Ok(Self { last_close, change })
    }
}
