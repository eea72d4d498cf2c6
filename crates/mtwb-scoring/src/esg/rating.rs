//! ESG letter-rating scale and component weights.

use crate::error::ConfigError;
use crate::weights::WEIGHT_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Letter ratings of the default scale, best first.
pub const RATING_LETTERS: [&str; 9] = ["AAA", "AA", "A", "BBB", "BB", "B", "CCC", "CC", "C"];

/// Anchor used for an unknown or absent rating.
pub const UNKNOWN_ANCHOR: f64 = 50.0;

const DEFAULT_ANCHORS: [f64; 9] = [100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 30.0, 20.0, 10.0];

/// Maps a letter rating to a numeric anchor on 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingScale {
    /// Anchor per rating letter
    anchors: BTreeMap<String, f64>,
    /// Anchor for unknown ratings
    unknown_anchor: f64,
}

impl RatingScale {
    /// Build a scale from explicit anchors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAnchor`] when an anchor is not within
    /// 0..=100.
    pub fn new<I, K>(anchors: I, unknown_anchor: f64) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let scale = Self {
            anchors: anchors
                .into_iter()
                .map(|(letter, anchor)| (normalize_letter(letter.as_ref()), anchor))
                .collect(),
            unknown_anchor,
        };
        scale.validate()?;
        Ok(scale)
    }

    /// Check every anchor lies within 0..=100.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAnchor`] for the first bad anchor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self
            .anchors
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .chain(std::iter::once(("<unknown>", self.unknown_anchor)));
        for (rating, anchor) in entries {
            if !(0.0..=100.0).contains(&anchor) {
                return Err(ConfigError::InvalidAnchor {
                    rating: rating.to_string(),
                    anchor,
                });
            }
        }
        Ok(())
    }

    /// Anchor for a rating; unknown or absent ratings get the neutral anchor.
    pub fn anchor(&self, rating: Option<&str>) -> f64 {
        rating
            .map(normalize_letter)
            .and_then(|letter| self.anchors.get(&letter).copied())
            .unwrap_or(self.unknown_anchor)
    }

    /// Whether the rating is defined on this scale.
    pub fn is_known(&self, rating: &str) -> bool {
        self.anchors.contains_key(&normalize_letter(rating))
    }

    /// Anchor for unknown ratings.
    pub const fn unknown_anchor(&self) -> f64 {
        self.unknown_anchor
    }

    /// Defined ratings, highest anchor first.
    pub fn letters(&self) -> Vec<(&str, f64)> {
        let mut letters: Vec<_> = self.anchors.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        letters.sort_by(|a, b| b.1.total_cmp(&a.1));
        letters
    }
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            anchors: RATING_LETTERS
                .iter()
                .zip(DEFAULT_ANCHORS)
                .map(|(letter, anchor)| ((*letter).to_string(), anchor))
                .collect(),
            unknown_anchor: UNKNOWN_ANCHOR,
        }
    }
}

/// Weights of the three ESG components. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsgWeights {
    /// External rating weight (default: 0.40)
    pub rating: f64,
    /// Carbon-target weight (default: 0.35)
    pub carbon: f64,
    /// Community-engagement weight (default: 0.25)
    pub community: f64,
}

impl EsgWeights {
    /// Sum of the three weights.
    pub fn total(&self) -> f64 {
        self.rating + self.carbon + self.community
    }

    /// Check the weights are non-negative and sum to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EsgWeightSum`] otherwise.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parts = [self.rating, self.carbon, self.community];
        let total = self.total();
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0)
            || (total - 1.0).abs() > WEIGHT_TOLERANCE
        {
            return Err(ConfigError::EsgWeightSum(total));
        }
        Ok(())
    }
}

impl Default for EsgWeights {
    fn default() -> Self {
        Self {
            rating: 0.40,
            carbon: 0.35,
            community: 0.25,
        }
    }
}

fn normalize_letter(letter: &str) -> String {
    letter.trim().to_ascii_uppercase()
}
