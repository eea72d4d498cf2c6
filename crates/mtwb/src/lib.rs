#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mtwb/mtwb-evaluator/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod universe;

// Re-export main types from sub-crates
pub use mtwb_data as data;
pub use mtwb_output as output;
pub use mtwb_scoring as scoring;

pub use config::{CONFIG_ENV, EsgConfig, EvaluatorConfig, WeightSetting, resolve_config_path};
pub use error::{Error, Result};
pub use evaluator::{Evaluation, Evaluator};
pub use universe::{DefaultUniverse, ListedUniverse, Universe};

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
