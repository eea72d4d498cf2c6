//! Market overview of an evaluated universe.

use mtwb_scoring::{CategoryMap, InstrumentKind, ScoredSecurity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ratings counted as ESG leaders.
const LEADER_RATINGS: [&str; 2] = ["AAA", "AA"];

/// A symbol and its composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMark {
    /// Ticker symbol
    pub symbol: String,
    /// Composite score
    pub composite: f64,
}

impl fmt::Display for ScoreMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1})", self.symbol, self.composite)
    }
}

/// Aggregate view of a scored universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSummary {
    /// Securities scored
    pub count: usize,
    /// Stocks among them
    pub stocks: usize,
    /// ETFs among them
    pub etfs: usize,
    /// Mean composite, 0 for an empty universe
    pub average_composite: f64,
    /// Highest composite; the earlier security wins a tie
    pub best: Option<ScoreMark>,
    /// Lowest composite; the earlier security wins a tie
    pub worst: Option<ScoreMark>,
    /// Securities per category label
    pub categories: BTreeMap<String, usize>,
    /// Stocks rated AA or better
    pub esg_leaders: usize,
}

impl LeaderboardSummary {
    /// Share of the universe in `category`, 0 when empty.
    pub fn category_share(&self, category: &str) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.categories.get(category).copied().unwrap_or(0) as f64 / self.count as f64
    }

    /// Format as ASCII for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str("\nMarket Overview\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  Securities:           {} ({} stocks, {} ETFs)\n",
            self.count, self.stocks, self.etfs
        ));
        output.push_str(&format!("  Average Composite:    {:.1}\n", self.average_composite));
        if let Some(best) = &self.best {
            output.push_str(&format!("  Top Performer:        {best}\n"));
        }
        if let Some(worst) = &self.worst {
            output.push_str(&format!("  Lowest Score:         {worst}\n"));
        }
        output.push_str(&format!("  ESG Leaders (AA+):    {}\n", self.esg_leaders));

        if !self.categories.is_empty() {
            output.push_str("\nBy Category:\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for (label, count) in &self.categories {
                output.push_str(&format!(
                    "  {:<24} {:>5} {:>9.1}%\n",
                    label,
                    count,
                    self.category_share(label) * 100.0
                ));
            }
        }

        output.push_str(&"=".repeat(60));
        output.push('\n');
        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::from("## Market Overview\n\n");

        output.push_str(&format!(
            "- **Securities:** {} ({} stocks, {} ETFs)\n",
            self.count, self.stocks, self.etfs
        ));
        output.push_str(&format!("- **Average Composite:** {:.1}\n", self.average_composite));
        if let Some(best) = &self.best {
            output.push_str(&format!("- **Top Performer:** {best}\n"));
        }
        if let Some(worst) = &self.worst {
            output.push_str(&format!("- **Lowest Score:** {worst}\n"));
        }
        output.push_str(&format!("- **ESG Leaders (AA+):** {}\n", self.esg_leaders));

        if !self.categories.is_empty() {
            output.push_str("\n| Category | Count |\n|----------|------:|\n");
            for (label, count) in &self.categories {
                output.push_str(&format!("| {label} | {count} |\n"));
            }
        }
        output
    }
}

impl fmt::Display for LeaderboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Market Overview: {} securities", self.count)?;
        writeln!(f, "  Average Composite: {:.1}", self.average_composite)?;
        if let Some(best) = &self.best {
            writeln!(f, "  Top Performer: {best}")?;
        }
        writeln!(f, "  ESG Leaders: {}", self.esg_leaders)?;
        Ok(())
    }
}

/// Summarize a scored universe, bucketing securities with `categories`.
pub fn generate_summary(securities: &[ScoredSecurity], categories: &CategoryMap) -> LeaderboardSummary {
    let count = securities.len();
    let etfs = securities.iter().filter(|s| s.kind().is_etf()).count();

    let average_composite = if count == 0 {
        0.0
    } else {
        securities.iter().map(ScoredSecurity::composite).sum::<f64>() / count as f64
    };

    let mut best: Option<&ScoredSecurity> = None;
    let mut worst: Option<&ScoredSecurity> = None;
    for security in securities {
        if best.is_none_or(|b| security.composite() > b.composite()) {
            best = Some(security);
        }
        if worst.is_none_or(|w| security.composite() < w.composite()) {
            worst = Some(security);
        }
    }

    let mut by_category = BTreeMap::new();
    for security in securities {
        let label = categories.resolve(security.kind(), security.raw().sector.as_deref());
        *by_category.entry(label.to_string()).or_insert(0) += 1;
    }

    let esg_leaders = securities
        .iter()
        .filter(|s| s.kind() == InstrumentKind::Stock && LEADER_RATINGS.contains(&s.esg().rating.as_str()))
        .count();

    LeaderboardSummary {
        count,
        stocks: count - etfs,
        etfs,
        average_composite,
        best: best.map(mark),
        worst: worst.map(mark),
        categories: by_category,
        esg_leaders,
    }
}

fn mark(security: &ScoredSecurity) -> ScoreMark {
    ScoreMark {
        symbol: security.symbol().to_string(),
        composite: security.composite(),
    }
}
