//! Batch min-max normalization onto a 0–100 scale.
//!
//! Extremes are always taken over the whole universe, so normalization can
//! only run once every security has been collected. Missing inputs are
//! replaced by a placeholder before the extremes are computed.

use serde::{Deserialize, Serialize};

/// Score given to every member of a flat (or empty) distribution.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Placeholder used for missing inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Midpoint of the present values' range. A missing input scores 50 and
    /// never widens the scale.
    #[default]
    Midpoint,

    /// Zero. Matches a plain `fillna(0)` and can stretch the scale.
    Zero,
}

/// Extremes of one metric across a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchScale {
    min: f64,
    max: f64,
    fill: f64,
}

impl BatchScale {
    /// Fit the scale to a batch of values.
    pub fn fit(values: &[Option<f64>], policy: MissingPolicy) -> Self {
        let present = values.iter().filter_map(|v| finite(*v));
        let extremes = present.fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

        let Some((lo, hi)) = extremes else {
            return Self {
                min: 0.0,
                max: 0.0,
                fill: 0.0,
            };
        };

        let fill = match policy {
            MissingPolicy::Midpoint => lo + (hi - lo) / 2.0,
            MissingPolicy::Zero => 0.0,
        };

        if values.iter().any(|v| finite(*v).is_none()) {
            Self {
                min: lo.min(fill),
                max: hi.max(fill),
                fill,
            }
        } else {
            Self { min: lo, max: hi, fill }
        }
    }

    /// Lowest value on the scale, placeholder included.
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Highest value on the scale, placeholder included.
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Value substituted for missing inputs.
    pub const fn fill(&self) -> f64 {
        self.fill
    }

    /// True when the batch carries no spread.
    pub fn is_degenerate(&self) -> bool {
        self.max - self.min <= 0.0
    }

    /// Map one value onto 0..=100.
    ///
    /// With `inverse`, the batch minimum scores 100 and the maximum scores 0.
    /// Values outside the fitted range are clamped.
    pub fn score(&self, value: Option<f64>, inverse: bool) -> f64 {
        if self.is_degenerate() {
            return NEUTRAL_SCORE;
        }
        let v = finite(value).unwrap_or(self.fill);
        let span = self.max - self.min;
        let score = if inverse {
            100.0 * (self.max - v) / span
        } else {
            100.0 * (v - self.min) / span
        };
        score.clamp(0.0, 100.0)
    }
}

/// Normalize a batch with the default [`MissingPolicy`].
pub fn normalize(values: &[Option<f64>], inverse: bool) -> Vec<f64> {
    normalize_with(values, inverse, MissingPolicy::default())
}

/// Normalize a batch with an explicit [`MissingPolicy`].
pub fn normalize_with(values: &[Option<f64>], inverse: bool, policy: MissingPolicy) -> Vec<f64> {
    let scale = BatchScale::fit(values, policy);
    values.iter().map(|v| scale.score(*v, inverse)).collect()
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
