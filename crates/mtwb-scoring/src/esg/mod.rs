//! ESG and community-alignment sub-score.
//!
//! A letter rating, a carbon-target score and a community-engagement score
//! are combined as `anchor * 0.40 + carbon * 0.35 + community * 0.25` (with
//! the default [`EsgWeights`]). The result is not rescaled here; the
//! composite scorer multiplies it onto the common scale.
//!
//! ETFs are not differentiated: they always receive a fixed neutral record.

pub mod directory;
pub mod rating;

pub use directory::{EsgDirectory, EsgFallback};
pub use rating::{EsgWeights, RATING_LETTERS, RatingScale, UNKNOWN_ANCHOR};

use crate::error::ConfigError;
use crate::security::InstrumentKind;
use serde::{Deserialize, Serialize};

/// Rating shown for ETFs.
pub const ETF_RATING: &str = "N/A";

/// Rating shown for a stock without an external rating.
pub const UNRATED: &str = "NR";

/// Carbon or community score used when the input is absent.
pub const NEUTRAL_COMPONENT: u8 = 50;

/// Fixed ESG sub-score of every ETF.
pub const ETF_SUB_SCORE: f64 = 12.5;

/// ESG inputs for one stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsgInputs {
    /// External letter rating (AAA..C)
    #[serde(default)]
    pub rating: Option<String>,

    /// Carbon reduction / renewable energy score, 0..=100
    #[serde(default)]
    pub carbon: Option<u8>,

    /// Community engagement score, 0..=100
    #[serde(default)]
    pub community: Option<u8>,

    /// Free-text summary of community initiatives
    #[serde(default)]
    pub initiatives: Option<String>,
}

impl EsgInputs {
    /// Create inputs with a rating and both scores.
    pub fn new(rating: impl Into<String>, carbon: u8, community: u8) -> Self {
        Self {
            rating: Some(rating.into()),
            carbon: Some(carbon),
            community: Some(community),
            initiatives: None,
        }
    }

    /// Attach a community-initiatives note.
    pub fn with_initiatives(mut self, initiatives: impl Into<String>) -> Self {
        self.initiatives = Some(initiatives.into());
        self
    }
}

/// Result of ESG scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsgResult {
    /// Sub-score on the native ESG budget
    pub sub_score: f64,
    /// Rating letter as used
    pub rating: String,
    /// Carbon score as used
    pub carbon: u8,
    /// Community score as used
    pub community: u8,
    /// Community-initiatives note, if any
    pub initiatives: Option<String>,
}

impl EsgResult {
    /// The fixed neutral record given to every ETF.
    pub fn etf_default() -> Self {
        Self {
            sub_score: ETF_SUB_SCORE,
            rating: ETF_RATING.to_string(),
            carbon: NEUTRAL_COMPONENT,
            community: NEUTRAL_COMPONENT,
            initiatives: None,
        }
    }

    /// Whether this is the ETF placeholder record.
    pub fn is_etf_default(&self) -> bool {
        self.rating == ETF_RATING
    }
}

/// Computes ESG sub-scores. Never fails once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct EsgScorer {
    scale: RatingScale,
    weights: EsgWeights,
}

impl EsgScorer {
    /// Create a scorer with an explicit rating scale and weights.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the weights do not sum to 1.0 or an
    /// anchor is out of range.
    pub fn new(scale: RatingScale, weights: EsgWeights) -> Result<Self, ConfigError> {
        scale.validate()?;
        weights.validate()?;
        Ok(Self { scale, weights })
    }

    /// Rating scale in use.
    pub const fn scale(&self) -> &RatingScale {
        &self.scale
    }

    /// Component weights in use.
    pub const fn weights(&self) -> &EsgWeights {
        &self.weights
    }

    /// Score raw ESG inputs.
    ///
    /// An unknown or absent rating uses the neutral anchor, absent scores
    /// use 50 and scores above 100 are clamped.
    pub fn score(&self, rating: Option<&str>, carbon: Option<u8>, community: Option<u8>) -> EsgResult {
        let anchor = self.scale.anchor(rating);
        let carbon = carbon.unwrap_or(NEUTRAL_COMPONENT).min(100);
        let community = community.unwrap_or(NEUTRAL_COMPONENT).min(100);

        let sub_score = anchor * self.weights.rating
            + f64::from(carbon) * self.weights.carbon
            + f64::from(community) * self.weights.community;

        let rating = rating
            .map(|r| r.trim().to_ascii_uppercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| UNRATED.to_string());

        EsgResult {
            sub_score,
            rating,
            carbon,
            community,
            initiatives: None,
        }
    }

    /// Score an [`EsgInputs`] record, carrying its initiatives note.
    pub fn score_inputs(&self, inputs: &EsgInputs) -> EsgResult {
        EsgResult {
            initiatives: inputs.initiatives.clone(),
            ..self.score(inputs.rating.as_deref(), inputs.carbon, inputs.community)
        }
    }

    /// Score by instrument kind: ETFs bypass the inputs entirely.
    pub fn score_for(&self, kind: InstrumentKind, inputs: &EsgInputs) -> EsgResult {
        match kind {
            InstrumentKind::Etf => EsgResult::etf_default(),
            InstrumentKind::Stock => self.score_inputs(inputs),
        }
    }
}

impl Default for EsgScorer {
    fn default() -> Self {
        Self {
            scale: RatingScale::default(),
            weights: EsgWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_best_inputs() {
        let result = EsgScorer::default().score(Some("AAA"), Some(100), Some(100));
        assert_relative_eq!(result.sub_score, 100.0, epsilon = 1e-9);
        assert_eq!(result.rating, "AAA");
    }

    #[test]
    fn test_poor_inputs() {
        let result = EsgScorer::default().score(Some("CCC"), Some(0), Some(0));
        assert_relative_eq!(result.sub_score, 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sample_company() {
        // AA / 85 / 90
        let result = EsgScorer::default().score(Some("AA"), Some(85), Some(90));
        assert_relative_eq!(result.sub_score, 36.0 + 29.75 + 22.5, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_inputs_are_neutral() {
        let result = EsgScorer::default().score(None, None, None);
        assert_relative_eq!(result.sub_score, 50.0, epsilon = 1e-9);
        assert_eq!(result.rating, UNRATED);
        assert_eq!(result.carbon, NEUTRAL_COMPONENT);
        assert_eq!(result.community, NEUTRAL_COMPONENT);
    }

    #[test]
    fn test_unknown_rating_uses_neutral_anchor() {
        let scorer = EsgScorer::default();
        let unknown = scorer.score(Some("ZZZ"), Some(60), Some(60));
        let b_rated = scorer.score(Some("B"), Some(60), Some(60));
        assert_relative_eq!(unknown.sub_score, b_rated.sub_score, epsilon = 1e-9);
        assert_eq!(unknown.rating, "ZZZ");
    }

    #[test]
    fn test_scores_above_range_clamp() {
        let result = EsgScorer::default().score(Some("A"), Some(250), Some(101));
        assert_eq!(result.carbon, 100);
        assert_eq!(result.community, 100);
    }

    #[test]
    fn test_etf_bypasses_inputs() {
        let scorer = EsgScorer::default();
        let strong = EsgInputs::new("AAA", 100, 100);
        let result = scorer.score_for(InstrumentKind::Etf, &strong);
        assert_eq!(result, EsgResult::etf_default());
        assert_eq!(result.rating, "N/A");
        assert_eq!(result.carbon, 50);
        assert_eq!(result.community, 50);
        assert_relative_eq!(result.sub_score, 12.5);
        assert!(result.is_etf_default());
    }

    #[test]
    fn test_initiatives_carried() {
        let inputs = EsgInputs::new("A", 70, 80).with_initiatives("Food security");
        let result = EsgScorer::default().score_for(InstrumentKind::Stock, &inputs);
        assert_eq!(result.initiatives.as_deref(), Some("Food security"));
    }

    #[test]
    fn test_rejects_bad_weights() {
        let weights = EsgWeights {
            rating: 0.4,
            carbon: 0.4,
            community: 0.4,
        };
        assert!(EsgScorer::new(RatingScale::default(), weights).is_err());
    }
}
