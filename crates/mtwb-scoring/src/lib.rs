#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mtwb/mtwb-evaluator/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod category;
pub mod composite;
pub mod error;
pub mod esg;
pub mod fit;
pub mod normalize;
pub mod rank;
pub mod registry;
pub mod security;
pub mod weights;

pub use category::{CategoryMap, DefaultCategory};
pub use composite::{BatchExtremes, CompositeScorer, ESG_SCALE_FACTOR, Scorecard};
pub use error::{ConfigError, ParseError};
pub use esg::{EsgDirectory, EsgFallback, EsgInputs, EsgResult, EsgScorer, EsgWeights, RatingScale};
pub use fit::FitTier;
pub use normalize::{BatchScale, MissingPolicy, NEUTRAL_SCORE, normalize, normalize_with};
pub use rank::{InstrumentFilter, RankQuery, RankedEntry, RankedList, SecurityRanker};
pub use registry::{SubScoreInfo, available_sub_scores, get_sub_score_info};
pub use security::{InstrumentKind, Metric, RawMetrics, ScoredSecurity, SubScore, SubScores};
pub use weights::{PRESETS, WEIGHT_TOLERANCE, WeightTable};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
