//! Errors surfaced by the evaluator facade.

use mtwb_data::DataError;
use mtwb_scoring::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for evaluator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running an evaluation.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration file could not be read.
    #[error("Cannot read config {path}: {source}")]
    ConfigIo {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for the evaluator.
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Cannot serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Weights, ESG scale or presets are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The data source failed as a whole.
    #[error(transparent)]
    Data(#[from] DataError),

    /// A ticker is not part of the evaluation.
    #[error("{symbol} was not evaluated: {reason}")]
    NotEvaluated {
        /// Requested ticker
        symbol: String,
        /// Why it is absent
        reason: String,
    },
}
