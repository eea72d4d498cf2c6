//! Qualitative fit tiers for a composite score.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative band of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FitTier {
    /// Below 50
    Poor,
    /// 50 to 65
    Moderate,
    /// 65 to 80
    Good,
    /// 80 and above
    Excellent,
}

impl FitTier {
    /// Band a composite score.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 65.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    /// Returns the display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Match",
            Self::Good => "Good Fit",
            Self::Moderate => "Moderate Fit",
            Self::Poor => "Poor Fit",
        }
    }

    /// One-line verdict for `symbol`.
    pub fn verdict(&self, symbol: &str) -> String {
        match self {
            Self::Excellent => format!(
                "{symbol} shows exceptional alignment of financial performance and community impact."
            ),
            Self::Good => {
                format!("{symbol} shows solid fundamentals with meaningful community engagement.")
            }
            Self::Moderate => {
                format!("{symbol} has mixed performance. Consider deeper ESG analysis.")
            }
            Self::Poor => format!("{symbol} may not align with a community-impact mandate."),
        }
    }
}

impl fmt::Display for FitTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, FitTier::Excellent)]
    #[case(80.0, FitTier::Excellent)]
    #[case(79.9, FitTier::Good)]
    #[case(65.0, FitTier::Good)]
    #[case(50.0, FitTier::Moderate)]
    #[case(49.99, FitTier::Poor)]
    #[case(0.0, FitTier::Poor)]
    fn test_tier_boundaries(#[case] score: f64, #[case] tier: FitTier) {
        assert_eq!(FitTier::from_score(score), tier);
    }

    #[test]
    fn test_verdict_names_symbol() {
        assert!(FitTier::Good.verdict("MSFT").starts_with("MSFT"));
        assert!(FitTier::Excellent > FitTier::Poor);
    }
}
