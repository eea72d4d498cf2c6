//! Security records flowing through a scoring pass.
//!
//! [`RawMetrics`] is what a market-data provider hands over, with every
//! numeric field optional. [`ScoredSecurity`] is the immutable result of one
//! scoring pass over a whole universe.

use crate::composite::Scorecard;
use crate::error::ParseError;
use crate::esg::EsgResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instrument class of a security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    /// Common stock
    Stock,

    /// Exchange-traded fund
    Etf,
}

impl InstrumentKind {
    /// Returns the display name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Stock => "Stock",
            Self::Etf => "ETF",
        }
    }

    /// Returns true for exchange-traded funds.
    pub const fn is_etf(&self) -> bool {
        matches!(self, Self::Etf)
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for InstrumentKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" | "stocks" | "equity" => Ok(Self::Stock),
            "etf" | "etfs" | "fund" => Ok(Self::Etf),
            _ => Err(ParseError::InstrumentKind(s.to_string())),
        }
    }
}

/// Raw financial metric feeding one financial sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Trailing price-to-earnings ratio
    PriceToEarnings,
    /// Market beta
    Beta,
    /// Dividend yield as a fraction
    DividendYield,
    /// Profit margin as a fraction
    ProfitMargin,
    /// Return on equity as a fraction
    ReturnOnEquity,
    /// 52-week price change as a fraction
    FiftyTwoWeekChange,
}

impl Metric {
    /// All metrics, in sub-score order.
    pub const ALL: [Self; 6] = [
        Self::PriceToEarnings,
        Self::Beta,
        Self::DividendYield,
        Self::ProfitMargin,
        Self::ReturnOnEquity,
        Self::FiftyTwoWeekChange,
    ];

    /// Returns the field name used in files and reports.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PriceToEarnings => "pe_ratio",
            Self::Beta => "beta",
            Self::DividendYield => "dividend_yield",
            Self::ProfitMargin => "profit_margin",
            Self::ReturnOnEquity => "return_on_equity",
            Self::FiftyTwoWeekChange => "fifty_two_week_change",
        }
    }

    pub(crate) const fn index(&self) -> usize {
        match self {
            Self::PriceToEarnings => 0,
            Self::Beta => 1,
            Self::DividendYield => 2,
            Self::ProfitMargin => 3,
            Self::ReturnOnEquity => 4,
            Self::FiftyTwoWeekChange => 5,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Component of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubScore {
    /// Cheap valuation (inverse P/E)
    Valuation,
    /// Low volatility (inverse beta)
    Risk,
    /// Dividend income
    Income,
    /// Profit margin
    Profitability,
    /// Return on equity
    Efficiency,
    /// 52-week price growth
    Growth,
    /// ESG and community alignment
    Esg,
}

impl SubScore {
    /// All components, in weight-table order.
    pub const ALL: [Self; 7] = [
        Self::Valuation,
        Self::Risk,
        Self::Income,
        Self::Profitability,
        Self::Efficiency,
        Self::Growth,
        Self::Esg,
    ];

    /// Returns the key used in configuration files.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Valuation => "valuation",
            Self::Risk => "risk",
            Self::Income => "income",
            Self::Profitability => "profitability",
            Self::Efficiency => "efficiency",
            Self::Growth => "growth",
            Self::Esg => "esg",
        }
    }

    /// Returns the raw metric behind a financial sub-score, `None` for ESG.
    pub const fn source_metric(&self) -> Option<Metric> {
        match self {
            Self::Valuation => Some(Metric::PriceToEarnings),
            Self::Risk => Some(Metric::Beta),
            Self::Income => Some(Metric::DividendYield),
            Self::Profitability => Some(Metric::ProfitMargin),
            Self::Efficiency => Some(Metric::ReturnOnEquity),
            Self::Growth => Some(Metric::FiftyTwoWeekChange),
            Self::Esg => None,
        }
    }

    /// Whether a lower raw value scores higher.
    pub const fn is_inverse(&self) -> bool {
        matches!(self, Self::Valuation | Self::Risk)
    }

    pub(crate) const fn index(&self) -> usize {
        match self {
            Self::Valuation => 0,
            Self::Risk => 1,
            Self::Income => 2,
            Self::Profitability => 3,
            Self::Efficiency => 4,
            Self::Growth => 5,
            Self::Esg => 6,
        }
    }
}

impl fmt::Display for SubScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SubScore {
    type Err = ParseError;

    /// Accepts the configuration keys and the legacy column names
    /// (`pe_score`, `volatility_score`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "valuation" | "pe_score" => Ok(Self::Valuation),
            "risk" | "volatility_score" => Ok(Self::Risk),
            "income" | "dividend_score" => Ok(Self::Income),
            "profitability" | "profit_score" => Ok(Self::Profitability),
            "efficiency" | "roe_score" => Ok(Self::Efficiency),
            "growth" | "growth_score" => Ok(Self::Growth),
            "esg" | "esg_score" | "esg_score_normalized" => Ok(Self::Esg),
            _ => Err(ParseError::SubScore(s.to_string())),
        }
    }
}

/// Raw per-security fields delivered by a market-data provider.
///
/// Absent values are `None`, never zero: a zero dividend yield is a real
/// observation. Use [`RawMetrics::metric`] to read a value the way the
/// scorer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    /// Ticker symbol, unique within a run
    pub symbol: String,

    /// Stock or ETF
    pub kind: InstrumentKind,

    /// Provider sector label
    #[serde(default)]
    pub sector: Option<String>,

    /// Trailing P/E ratio
    #[serde(default)]
    pub pe_ratio: Option<f64>,

    /// Beta
    #[serde(default)]
    pub beta: Option<f64>,

    /// Dividend yield (0.04 = 4%)
    #[serde(default)]
    pub dividend_yield: Option<f64>,

    /// Profit margin (0.15 = 15%)
    #[serde(default)]
    pub profit_margin: Option<f64>,

    /// Return on equity (0.12 = 12%)
    #[serde(default)]
    pub return_on_equity: Option<f64>,

    /// 52-week price change (0.25 = +25%)
    #[serde(default)]
    pub fifty_two_week_change: Option<f64>,

    /// Market capitalization
    #[serde(default)]
    pub market_cap: Option<f64>,

    /// Last traded price
    #[serde(default)]
    pub current_price: Option<f64>,
}

impl RawMetrics {
    /// Create a record with every numeric field missing.
    pub fn new(symbol: impl Into<String>, kind: InstrumentKind) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            sector: None,
            pe_ratio: None,
            beta: None,
            dividend_yield: None,
            profit_margin: None,
            return_on_equity: None,
            fifty_two_week_change: None,
            market_cap: None,
            current_price: None,
        }
    }

    /// Set the sector label.
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Set one financial metric.
    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        *self.slot_mut(metric) = Some(value);
        self
    }

    /// Set the market capitalization.
    pub const fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    /// Set the current price.
    pub const fn with_current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    /// Stored value of a metric, exactly as delivered.
    pub const fn stored(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::PriceToEarnings => self.pe_ratio,
            Metric::Beta => self.beta,
            Metric::DividendYield => self.dividend_yield,
            Metric::ProfitMargin => self.profit_margin,
            Metric::ReturnOnEquity => self.return_on_equity,
            Metric::FiftyTwoWeekChange => self.fifty_two_week_change,
        }
    }

    /// Value of a metric as it enters normalization.
    ///
    /// Non-finite values are missing. A P/E ratio at or below zero carries
    /// no valuation signal and is missing as well.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let value = self.stored(metric).filter(|v| v.is_finite())?;
        if metric == Metric::PriceToEarnings && value <= 0.0 {
            return None;
        }
        Some(value)
    }

    /// Number of financial metrics that resolve to missing.
    pub fn missing_count(&self) -> usize {
        Metric::ALL
            .iter()
            .filter(|m| self.metric(**m).is_none())
            .count()
    }

    fn slot_mut(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::PriceToEarnings => &mut self.pe_ratio,
            Metric::Beta => &mut self.beta,
            Metric::DividendYield => &mut self.dividend_yield,
            Metric::ProfitMargin => &mut self.profit_margin,
            Metric::ReturnOnEquity => &mut self.return_on_equity,
            Metric::FiftyTwoWeekChange => &mut self.fifty_two_week_change,
        }
    }
}

/// The six normalized financial sub-scores, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    /// Inverse P/E
    pub valuation: f64,
    /// Inverse beta
    pub risk: f64,
    /// Dividend yield
    pub income: f64,
    /// Profit margin
    pub profitability: f64,
    /// Return on equity
    pub efficiency: f64,
    /// 52-week change
    pub growth: f64,
}

impl SubScores {
    pub(crate) const fn from_array(scores: [f64; 6]) -> Self {
        Self {
            valuation: scores[Metric::PriceToEarnings.index()],
            risk: scores[Metric::Beta.index()],
            income: scores[Metric::DividendYield.index()],
            profitability: scores[Metric::ProfitMargin.index()],
            efficiency: scores[Metric::ReturnOnEquity.index()],
            growth: scores[Metric::FiftyTwoWeekChange.index()],
        }
    }

    /// Score of a financial component, `None` for ESG.
    pub const fn get(&self, sub_score: SubScore) -> Option<f64> {
        match sub_score {
            SubScore::Valuation => Some(self.valuation),
            SubScore::Risk => Some(self.risk),
            SubScore::Income => Some(self.income),
            SubScore::Profitability => Some(self.profitability),
            SubScore::Efficiency => Some(self.efficiency),
            SubScore::Growth => Some(self.growth),
            SubScore::Esg => None,
        }
    }
}

/// A security scored within one pass. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSecurity {
    raw: RawMetrics,
    sub_scores: SubScores,
    esg: EsgResult,
    esg_normalized: f64,
    weighted_sum: f64,
    composite: f64,
}

impl ScoredSecurity {
    pub(crate) fn new(raw: RawMetrics, esg: EsgResult, card: Scorecard, composite: f64) -> Self {
        Self {
            raw,
            sub_scores: card.sub_scores,
            esg,
            esg_normalized: card.esg_normalized,
            weighted_sum: card.weighted_sum,
            composite,
        }
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.raw.symbol
    }

    /// Stock or ETF.
    pub const fn kind(&self) -> InstrumentKind {
        self.raw.kind
    }

    /// Raw provider fields.
    pub const fn raw(&self) -> &RawMetrics {
        &self.raw
    }

    /// Financial sub-scores.
    pub const fn sub_scores(&self) -> &SubScores {
        &self.sub_scores
    }

    /// ESG result, sub-score on its native budget.
    pub const fn esg(&self) -> &EsgResult {
        &self.esg
    }

    /// ESG sub-score multiplied onto the common scale.
    pub const fn esg_normalized(&self) -> f64 {
        self.esg_normalized
    }

    /// Weighted sum before the batch renormalization.
    pub const fn weighted_sum(&self) -> f64 {
        self.weighted_sum
    }

    /// Final composite score, 0..=100 relative to the universe.
    pub const fn composite(&self) -> f64 {
        self.composite
    }

    /// Score of any component on the common scale.
    pub const fn component(&self, sub_score: SubScore) -> f64 {
        match self.sub_scores.get(sub_score) {
            Some(score) => score,
            None => self.esg_normalized,
        }
    }
}
