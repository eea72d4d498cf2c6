//! Fundamental data fetching from Yahoo Finance.
//!
//! Fundamentals come from the `quoteSummary` endpoint. The response is parsed
//! by [`parse_quote_summary`], a pure function, so the mapping can be tested
//! without the network.

use crate::error::{DataError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const MODULES: &str = "summaryDetail,defaultKeyStatistics,financialData,assetProfile,price";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

/// Fundamentals of one security as reported by Yahoo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalData {
    /// Stock symbol
    pub symbol: String,
    /// Yahoo quote type (EQUITY, ETF, ...)
    pub quote_type: Option<String>,
    /// Sector label
    pub sector: Option<String>,
    /// Trailing P/E ratio
    pub trailing_pe: Option<f64>,
    /// Beta (3-year beta for funds)
    pub beta: Option<f64>,
    /// Dividend yield (trailing yield for funds)
    pub dividend_yield: Option<f64>,
    /// Profit margin
    pub profit_margin: Option<f64>,
    /// Return on equity
    pub return_on_equity: Option<f64>,
    /// 52-week price change
    pub fifty_two_week_change: Option<f64>,
    /// Market capitalization (total assets for funds)
    pub market_cap: Option<f64>,
    /// Current price
    pub current_price: Option<f64>,
}

/// Parse a `quoteSummary` response body.
///
/// Yahoo wraps every number as `{"raw": .., "fmt": ..}`; absent or empty
/// objects become `None`.
///
/// # Errors
///
/// Returns [`DataError::Parse`] when the body is not a quote summary,
/// [`DataError::YahooApi`] when Yahoo reports an error and
/// [`DataError::MissingData`] when the result list is empty.
pub fn parse_quote_summary(symbol: &str, body: &Value) -> Result<FundamentalData> {
    let summary = &body["quoteSummary"];
    if !summary.is_object() {
        return Err(DataError::Parse(format!("{symbol}: no quoteSummary object")));
    }
    if let Some(description) = summary["error"]["description"].as_str() {
        return Err(DataError::YahooApi(format!("{symbol}: {description}")));
    }
    let result = summary["result"]
        .as_array()
        .and_then(|results| results.first())
        .ok_or_else(|| DataError::missing(symbol, "empty quote summary"))?;

    let detail = &result["summaryDetail"];
    let stats = &result["defaultKeyStatistics"];
    let financial = &result["financialData"];
    let price = &result["price"];

    Ok(FundamentalData {
        symbol: symbol.to_string(),
        quote_type: price["quoteType"].as_str().map(str::to_string),
        sector: result["assetProfile"]["sector"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        trailing_pe: raw(&detail["trailingPE"]),
        beta: raw(&detail["beta"])
            .or_else(|| raw(&stats["beta"]))
            .or_else(|| raw(&stats["beta3Year"])),
        dividend_yield: raw(&detail["dividendYield"]).or_else(|| raw(&detail["yield"])),
        profit_margin: raw(&financial["profitMargins"]).or_else(|| raw(&stats["profitMargins"])),
        return_on_equity: raw(&financial["returnOnEquity"]),
        fifty_two_week_change: raw(&stats["52WeekChange"]),
        market_cap: raw(&detail["marketCap"])
            .or_else(|| raw(&price["marketCap"]))
            .or_else(|| raw(&detail["totalAssets"])),
        current_price: raw(&financial["currentPrice"]).or_else(|| raw(&price["regularMarketPrice"])),
    })
}

fn raw(value: &Value) -> Option<f64> {
    value["raw"].as_f64().or_else(|| value.as_f64())
}

/// Yahoo Finance fundamentals provider.
#[derive(Debug)]
pub struct YahooFundamentalsProvider {
    client: reqwest::Client,
    rate_limit_delay: Duration,
}

impl YahooFundamentalsProvider {
    /// Create a provider with default rate limiting (250ms per request).
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Network`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(250))
    }

    /// Create a provider with custom rate limiting.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Network`] if the HTTP client cannot be built.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            rate_limit_delay,
        })
    }

    /// Fetch fundamental data for a single symbol.
    pub async fn fetch_fundamentals(&self, symbol: &str) -> Result<FundamentalData> {
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}?modules={MODULES}");
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        }
        let body: Value = response.json().await?;

        sleep(self.rate_limit_delay).await;

        parse_quote_summary(symbol, &body)
    }
}
