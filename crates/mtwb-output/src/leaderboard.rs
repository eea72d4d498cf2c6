//! Ranked leaderboards and their table renderings.

use mtwb_scoring::{FitTier, InstrumentKind, RankedEntry, RankedList, SubScore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line of a leaderboard. Flat, so it maps onto one CSV record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// 1-based rank
    pub rank: usize,
    /// Ticker symbol
    pub symbol: String,
    /// Stock or ETF
    pub kind: InstrumentKind,
    /// Category bucket
    pub category: String,
    /// Provider sector
    pub sector: Option<String>,
    /// Composite score
    pub composite: f64,
    /// Valuation sub-score
    pub valuation: f64,
    /// Risk sub-score
    pub risk: f64,
    /// Income sub-score
    pub income: f64,
    /// Profitability sub-score
    pub profitability: f64,
    /// Efficiency sub-score
    pub efficiency: f64,
    /// Growth sub-score
    pub growth: f64,
    /// ESG rating letter
    pub esg_rating: String,
    /// ESG sub-score on its native budget
    pub esg_score: f64,
    /// ESG sub-score on the common scale
    pub esg_normalized: f64,
    /// Current price
    pub price: Option<f64>,
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Fit tier of the composite
    pub fit: FitTier,
}

impl LeaderboardRow {
    /// Build a row from a ranked entry.
    pub fn from_entry(entry: &RankedEntry<'_>) -> Self {
        let security = entry.security;
        let raw = security.raw();
        let scores = security.sub_scores();
        Self {
            rank: entry.rank,
            symbol: security.symbol().to_string(),
            kind: security.kind(),
            category: entry.category.clone(),
            sector: raw.sector.clone(),
            composite: security.composite(),
            valuation: scores.valuation,
            risk: scores.risk,
            income: scores.income,
            profitability: scores.profitability,
            efficiency: scores.efficiency,
            growth: scores.growth,
            esg_rating: security.esg().rating.clone(),
            esg_score: security.esg().sub_score,
            esg_normalized: security.esg_normalized(),
            price: raw.current_price,
            market_cap: raw.market_cap,
            fit: FitTier::from_score(security.composite()),
        }
    }

    /// Score of one component on the common scale.
    pub const fn component(&self, sub_score: SubScore) -> f64 {
        match sub_score {
            SubScore::Valuation => self.valuation,
            SubScore::Risk => self.risk,
            SubScore::Income => self.income,
            SubScore::Profitability => self.profitability,
            SubScore::Efficiency => self.efficiency,
            SubScore::Growth => self.growth,
            SubScore::Esg => self.esg_normalized,
        }
    }
}

/// A titled, ranked table of securities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Table title
    pub title: String,
    /// Rows in rank order
    pub rows: Vec<LeaderboardRow>,
}

impl Leaderboard {
    /// Build a leaderboard from a ranked list.
    pub fn new(title: impl Into<String>, ranked: &RankedList<'_>) -> Self {
        Self {
            title: title.into(),
            rows: ranked.iter().map(LeaderboardRow::from_entry).collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when nothing matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Format as ASCII table for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&"=".repeat(96));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No securities match the current filters.\n");
            return output;
        }

        output.push_str(&format!(
            "{:>4}  {:<7} {:<5} {:<20} {:>9} {:>6} {:>6} {:>6} {:>6} {:>10}  {}\n",
            "#", "Symbol", "Type", "Category", "Composite", "Value", "Risk", "Income", "ESG", "Price",
            "Fit"
        ));
        output.push_str(&"-".repeat(96));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:>4}  {:<7} {:<5} {:<20} {:>9.1} {:>6.1} {:>6.1} {:>6.1} {:>6} {:>10}  {}\n",
                row.rank,
                row.symbol,
                row.kind.name(),
                truncate(&row.category, 20),
                row.composite,
                row.valuation,
                row.risk,
                row.income,
                row.esg_rating,
                format_price(row.price),
                row.fit
            ));
        }

        output.push_str(&"=".repeat(96));
        output.push('\n');
        output
    }

    /// Format as Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut output = format!("# {}\n\n", self.title);

        if self.rows.is_empty() {
            output.push_str("_No securities match the current filters._\n");
            return output;
        }

        output.push_str(
            "| Rank | Symbol | Type | Category | Composite | Valuation | Risk | Income | Profitability | Efficiency | Growth | ESG | Price | Market Cap | Fit |\n",
        );
        output.push_str(
            "|-----:|--------|------|----------|----------:|----------:|-----:|-------:|--------------:|-----------:|-------:|-----|------:|-----------:|-----|\n",
        );

        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {} | {} | {} | {} |\n",
                row.rank,
                row.symbol,
                row.kind,
                row.category,
                row.composite,
                row.valuation,
                row.risk,
                row.income,
                row.profitability,
                row.efficiency,
                row.growth,
                row.esg_rating,
                format_price(row.price),
                format_market_cap(row.market_cap),
                row.fit
            ));
        }

        output
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} securities)", self.title, self.rows.len())?;
        for row in &self.rows {
            writeln!(f, "  {:>3}. {:<6} {:.1}", row.rank, row.symbol, row.composite)?;
        }
        Ok(())
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
        short.push('~');
        short
    }
}

/// `$227.50`, or `-` when absent.
pub(crate) fn format_price(price: Option<f64>) -> String {
    price.map_or_else(|| "-".to_string(), |p| format!("${p:.2}"))
}

/// `$3.40T`, `$512.0B`, `$950.0M`, or `-` when absent.
pub(crate) fn format_market_cap(market_cap: Option<f64>) -> String {
    match market_cap {
        None => "-".to_string(),
        Some(cap) if cap >= 1e12 => format!("${:.2}T", cap / 1e12),
        Some(cap) if cap >= 1e9 => format!("${:.1}B", cap / 1e9),
        Some(cap) if cap >= 1e6 => format!("${:.1}M", cap / 1e6),
        Some(cap) => format!("${cap:.0}"),
    }
}
