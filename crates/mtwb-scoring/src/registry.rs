//! Sub-score registry
//!
//! Static descriptions of the seven composite components, used for legends,
//! the `weights` listing and name lookup.

use crate::security::{Metric, SubScore};

/// Sub-score metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SubScoreInfo {
    /// Component
    pub sub_score: SubScore,
    /// Human-readable label
    pub label: &'static str,
    /// Raw metric feeding the component, `None` for ESG
    pub metric: Option<Metric>,
    /// Whether a lower raw value scores higher
    pub inverse: bool,
    /// What the component rewards
    pub description: &'static str,
}

/// Get all sub-score info, in weight-table order
pub fn available_sub_scores() -> Vec<SubScoreInfo> {
    vec![
        SubScoreInfo {
            sub_score: SubScore::Valuation,
            label: "Valuation",
            metric: Some(Metric::PriceToEarnings),
            inverse: true,
            description: "Lower trailing P/E scores higher",
        },
        SubScoreInfo {
            sub_score: SubScore::Risk,
            label: "Risk",
            metric: Some(Metric::Beta),
            inverse: true,
            description: "Lower market beta scores higher",
        },
        SubScoreInfo {
            sub_score: SubScore::Income,
            label: "Income",
            metric: Some(Metric::DividendYield),
            inverse: false,
            description: "Higher dividend yield scores higher",
        },
        SubScoreInfo {
            sub_score: SubScore::Profitability,
            label: "Profitability",
            metric: Some(Metric::ProfitMargin),
            inverse: false,
            description: "Higher profit margin scores higher",
        },
        SubScoreInfo {
            sub_score: SubScore::Efficiency,
            label: "Efficiency",
            metric: Some(Metric::ReturnOnEquity),
            inverse: false,
            description: "Higher return on equity scores higher",
        },
        SubScoreInfo {
            sub_score: SubScore::Growth,
            label: "Growth",
            metric: Some(Metric::FiftyTwoWeekChange),
            inverse: false,
            description: "Stronger 52-week price change scores higher",
        },
        SubScoreInfo {
            sub_score: SubScore::Esg,
            label: "ESG & Community",
            metric: None,
            inverse: false,
            description: "ESG rating, carbon targets and community engagement",
        },
    ]
}

/// Get sub-score info by key or legacy column name
pub fn get_sub_score_info(name: &str) -> Option<SubScoreInfo> {
    let sub_score = name.parse::<SubScore>().ok()?;
    available_sub_scores()
        .into_iter()
        .find(|info| info.sub_score == sub_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_sub_score() {
        let infos = available_sub_scores();
        assert_eq!(infos.len(), SubScore::ALL.len());
        for (info, sub_score) in infos.iter().zip(SubScore::ALL) {
            assert_eq!(info.sub_score, sub_score);
            assert_eq!(info.metric, sub_score.source_metric());
            assert_eq!(info.inverse, sub_score.is_inverse());
        }
    }

    #[test]
    fn test_get_sub_score_info() {
        let risk = get_sub_score_info("volatility_score").unwrap();
        assert_eq!(risk.sub_score, SubScore::Risk);
        assert_eq!(risk.metric, Some(Metric::Beta));

        assert!(get_sub_score_info("momentum").is_none());
    }
}
