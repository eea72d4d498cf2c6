//! Error types for scoring configuration.

use crate::security::SubScore;
use thiserror::Error;

/// Configuration errors, reported before any security is scored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A sub-score has no weight.
    #[error("Weight table is missing an entry for '{0}'")]
    MissingWeight(SubScore),

    /// A weight was given for a name that is not a sub-score.
    #[error("Unknown sub-score '{0}' in weight table")]
    UnknownSubScore(String),

    /// The same sub-score was weighted twice.
    #[error("Duplicate weight for '{0}'")]
    DuplicateWeight(SubScore),

    /// A weight is negative, NaN or infinite.
    #[error("Invalid weight {weight} for '{sub_score}': must be finite and non-negative")]
    InvalidWeight {
        /// Sub-score carrying the weight
        sub_score: SubScore,
        /// Offending weight
        weight: f64,
    },

    /// Composite weights do not add up to 1.0.
    #[error("Composite weights must sum to 1.0, got {0:.6}")]
    WeightSum(f64),

    /// ESG component weights do not add up to 1.0.
    #[error("ESG weights must sum to 1.0, got {0:.6}")]
    EsgWeightSum(f64),

    /// A rating anchor lies outside 0..=100.
    #[error("Invalid anchor {anchor} for rating '{rating}': must lie in 0..=100")]
    InvalidAnchor {
        /// Rating letter
        rating: String,
        /// Offending anchor
        anchor: f64,
    },

    /// No weight preset with this name.
    #[error("Unknown weight preset '{name}' (available: {available})")]
    UnknownPreset {
        /// Requested preset
        name: String,
        /// Comma-separated preset names
        available: String,
    },
}

/// Errors raised when parsing user-facing names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not a stock/ETF label.
    #[error("Unknown instrument kind: {0}")]
    InstrumentKind(String),

    /// Not an instrument filter label.
    #[error("Unknown instrument filter: {0} (expected any, stock or etf)")]
    InstrumentFilter(String),

    /// Not a sub-score name.
    #[error("Unknown sub-score: {0}")]
    SubScore(String),
}
