//! Per-security breakdown of a composite score.

use crate::leaderboard::{format_market_cap, format_price};
use mtwb_scoring::{
    EsgResult, FitTier, InstrumentKind, ScoredSecurity, SubScore, WeightTable, available_sub_scores,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One component of a composite: its score, its weight and what it adds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentLine {
    /// Component
    pub sub_score: SubScore,
    /// Display label
    pub label: String,
    /// Raw metric as the scorer saw it, `None` when missing or for ESG
    pub raw_value: Option<f64>,
    /// Score on the common scale
    pub score: f64,
    /// Weight in the active table
    pub weight: f64,
    /// `score * weight`
    pub contribution: f64,
}

/// Everything needed to explain one security's composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityBreakdown {
    /// Ticker symbol
    pub symbol: String,
    /// Stock or ETF
    pub kind: InstrumentKind,
    /// Category bucket
    pub category: String,
    /// Provider sector
    pub sector: Option<String>,
    /// Rank in the evaluated universe, when known
    pub rank: Option<usize>,
    /// Size of the evaluated universe
    pub universe_size: usize,
    /// Final composite score
    pub composite: f64,
    /// Weighted sum before batch renormalization
    pub weighted_sum: f64,
    /// Components in weight-table order
    pub components: Vec<ComponentLine>,
    /// ESG detail
    pub esg: EsgResult,
    /// Current price
    pub price: Option<f64>,
    /// Market capitalization
    pub market_cap: Option<f64>,
    /// Fit tier
    pub fit: FitTier,
    /// One-line verdict
    pub verdict: String,
}

impl SecurityBreakdown {
    /// Explain `security` under `weights`.
    pub fn new(
        security: &ScoredSecurity,
        category: impl Into<String>,
        weights: &WeightTable,
        universe_size: usize,
    ) -> Self {
        let components = available_sub_scores()
            .into_iter()
            .map(|info| {
                let score = security.component(info.sub_score);
                let weight = weights.get(info.sub_score);
                ComponentLine {
                    sub_score: info.sub_score,
                    label: info.label.to_string(),
                    raw_value: info.metric.and_then(|m| security.raw().metric(m)),
                    score,
                    weight,
                    contribution: score * weight,
                }
            })
            .collect();
        let fit = FitTier::from_score(security.composite());

        Self {
            symbol: security.symbol().to_string(),
            kind: security.kind(),
            category: category.into(),
            sector: security.raw().sector.clone(),
            rank: None,
            universe_size,
            composite: security.composite(),
            weighted_sum: security.weighted_sum(),
            components,
            esg: security.esg().clone(),
            price: security.raw().current_price,
            market_cap: security.raw().market_cap,
            fit,
            verdict: fit.verdict(security.symbol()),
        }
    }

    /// Attach the security's rank.
    pub const fn with_rank(mut self, rank: usize) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Sum of the component contributions.
    pub fn contribution_total(&self) -> f64 {
        self.components.iter().map(|c| c.contribution).sum()
    }

    /// Format as ASCII for terminal display.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nSecurity Breakdown: {} ({})\n", self.symbol, self.kind));
        output.push_str(&format!(
            "Category: {}   Sector: {}\n",
            self.category,
            self.sector.as_deref().unwrap_or("-")
        ));
        output.push_str(&format!(
            "Price: {}   Market Cap: {}\n",
            format_price(self.price),
            format_market_cap(self.market_cap)
        ));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "{:<16} {:>14} {:>10} {:>10} {:>14}\n",
            "Component", "Raw", "Score", "Weight", "Contribution"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');
        for line in &self.components {
            output.push_str(&format!(
                "{:<16} {:>14} {:>10.1} {:>9.0}% {:>14.2}\n",
                line.label,
                line.raw_value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}")),
                line.score,
                line.weight * 100.0,
                line.contribution
            ));
        }
        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!("{:<16} {:>52.2}\n", "Weighted Sum", self.weighted_sum));
        output.push_str(&format!("{:<16} {:>52.1}\n", "Composite", self.composite));
        if let Some(rank) = self.rank {
            output.push_str(&format!(
                "{:<16} {:>52}\n",
                "Rank",
                format!("{rank} of {}", self.universe_size)
            ));
        }
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "ESG: rating {}, carbon {}, community {}, sub-score {:.1}\n",
            self.esg.rating, self.esg.carbon, self.esg.community, self.esg.sub_score
        ));
        if let Some(initiatives) = &self.esg.initiatives {
            output.push_str(&format!("Community initiatives: {initiatives}\n"));
        }
        output.push_str(&format!("\n{}: {}\n", self.fit, self.verdict));

        output
    }

    /// Format as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = format!("# {} ({})\n\n", self.symbol, self.kind);

        output.push_str(&format!("- **Category:** {}\n", self.category));
        if let Some(sector) = &self.sector {
            output.push_str(&format!("- **Sector:** {sector}\n"));
        }
        output.push_str(&format!("- **Composite:** {:.1}\n", self.composite));
        if let Some(rank) = self.rank {
            output.push_str(&format!("- **Rank:** {rank} of {}\n", self.universe_size));
        }
        output.push_str(&format!("- **Fit:** {}\n\n", self.fit));

        output.push_str("| Component | Raw | Score | Weight | Contribution |\n");
        output.push_str("|-----------|----:|------:|-------:|-------------:|\n");
        for line in &self.components {
            output.push_str(&format!(
                "| {} | {} | {:.1} | {:.0}% | {:.2} |\n",
                line.label,
                line.raw_value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}")),
                line.score,
                line.weight * 100.0,
                line.contribution
            ));
        }

        output.push_str(&format!(
            "\n**ESG:** {} (carbon {}, community {})\n",
            self.esg.rating, self.esg.carbon, self.esg.community
        ));
        if let Some(initiatives) = &self.esg.initiatives {
            output.push_str(&format!("\n> {initiatives}\n"));
        }
        output.push_str(&format!("\n{}\n", self.verdict));
        output
    }
}

impl fmt::Display for SecurityBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}): {:.1}, {}", self.symbol, self.kind, self.composite, self.fit)?;
        for line in &self.components {
            writeln!(f, "  {}: {:.1} x {:.2}", line.label, line.score, line.weight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mtwb_scoring::{CompositeScorer, EsgInputs, EsgScorer, Metric, RawMetrics};

    fn scored() -> Vec<ScoredSecurity> {
        let esg = EsgScorer::default();
        let batch = vec![
            (
                RawMetrics::new("KO", InstrumentKind::Stock)
                    .with_sector("Consumer Defensive")
                    .with_metric(Metric::PriceToEarnings, 24.0)
                    .with_metric(Metric::DividendYield, 0.03),
                esg.score_inputs(
                    &EsgInputs::new("AA", 80, 85).with_initiatives("Water replenishment"),
                ),
            ),
            (
                RawMetrics::new("XOM", InstrumentKind::Stock)
                    .with_sector("Energy")
                    .with_metric(Metric::PriceToEarnings, 12.0)
                    .with_metric(Metric::DividendYield, 0.035),
                esg.score_inputs(&EsgInputs::new("BBB", 40, 60)),
            ),
        ];
        CompositeScorer::default().score_batch(batch)
    }

    #[test]
    fn test_contributions_add_up_to_weighted_sum() {
        let securities = scored();
        let weights = WeightTable::default();
        for security in &securities {
            let breakdown = SecurityBreakdown::new(security, "Any", &weights, securities.len());
            assert_eq!(breakdown.components.len(), 7);
            assert_relative_eq!(
                breakdown.contribution_total(),
                breakdown.weighted_sum,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_raw_values_and_esg_line() {
        let securities = scored();
        let breakdown = SecurityBreakdown::new(&securities[0], "Consumer Defensive", &WeightTable::default(), 2);

        let valuation = &breakdown.components[0];
        assert_eq!(valuation.sub_score, SubScore::Valuation);
        assert_eq!(valuation.raw_value, Some(24.0));
        assert_relative_eq!(valuation.score, 0.0);

        let esg = breakdown.components.last().unwrap();
        assert_eq!(esg.sub_score, SubScore::Esg);
        assert_eq!(esg.raw_value, None);
        assert_relative_eq!(esg.score, securities[0].esg_normalized());
    }

    #[test]
    fn test_renderings_carry_verdict_and_initiatives() {
        let securities = scored();
        let breakdown =
            SecurityBreakdown::new(&securities[0], "Consumer Defensive", &WeightTable::default(), 2)
                .with_rank(1);

        let ascii = breakdown.to_ascii_table();
        assert!(ascii.contains("Security Breakdown: KO"));
        assert!(ascii.contains("1 of 2"));
        assert!(ascii.contains("Water replenishment"));
        assert!(ascii.contains(&breakdown.verdict));

        let markdown = breakdown.to_markdown();
        assert!(markdown.starts_with("# KO (Stock)"));
        assert!(markdown.contains("**Rank:** 1 of 2"));
        assert!(markdown.contains("| Valuation |"));
    }
}
