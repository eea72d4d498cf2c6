//! Evaluator configuration.
//!
//! The configuration is TOML. Every section is optional:
//!
//! ```toml
//! weights = "growth"          # a preset name, or a table:
//! # [weights]
//! # valuation = 0.10
//! # ...
//! missing = "midpoint"        # or "zero"
//!
//! [esg]
//! weights = { rating = 0.40, carbon = 0.35, community = 0.25 }
//! fallback = { kind = "seeded", seed = 7 }
//!
//! [esg.entries.NEE]
//! rating = "AA"
//! carbon = 92
//! community = 70
//!
//! [categories]
//! other = "Other"
//! etf = "ETF"
//!
//! [[categories.buckets]]
//! name = "Green"
//! sectors = ["Utilities", "Renewable Energy"]
//! ```
//!
//! A config file is found with [`resolve_config_path`]: an explicit path,
//! then `$MTWB_CONFIG`, then `<config dir>/mtwb/config.toml` if it exists.

use crate::error::{Error, Result};
use mtwb_scoring::{
    CategoryMap, ConfigError, EsgFallback, EsgInputs, EsgWeights, MissingPolicy, RatingScale,
    WeightTable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "MTWB_CONFIG";

/// Weights as written in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightSetting {
    /// A named preset (`mtwb`, `growth`)
    Preset(String),
    /// An explicit table keyed by sub-score name
    Table(BTreeMap<String, f64>),
}

impl WeightSetting {
    /// Resolve to a validated table.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an unknown preset or an invalid table.
    pub fn resolve(&self) -> std::result::Result<WeightTable, ConfigError> {
        match self {
            Self::Preset(name) => WeightTable::preset(name),
            Self::Table(entries) => WeightTable::from_named(entries.iter().map(|(k, v)| (k, *v))),
        }
    }
}

impl Default for WeightSetting {
    fn default() -> Self {
        Self::Preset("mtwb".to_string())
    }
}

/// ESG section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsgConfig {
    /// Component weights
    pub weights: EsgWeights,
    /// Rating anchors
    pub scale: RatingScale,
    /// Inputs for tickers without an entry
    pub fallback: EsgFallback,
    /// Start from the built-in sample directory
    pub sample_directory: bool,
    /// Extra or overriding entries keyed by ticker
    pub entries: BTreeMap<String, EsgInputs>,
}

impl Default for EsgConfig {
    fn default() -> Self {
        Self {
            weights: EsgWeights::default(),
            scale: RatingScale::default(),
            fallback: EsgFallback::default(),
            sample_directory: true,
            entries: BTreeMap::new(),
        }
    }
}

/// Complete evaluator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Weight preset or table
    pub weights: WeightSetting,
    /// Missing-value policy for normalization
    pub missing: MissingPolicy,
    /// ESG scoring and directory
    pub esg: EsgConfig,
    /// Sector to category taxonomy
    pub categories: CategoryMap,
}

impl EvaluatorConfig {
    /// Parse a TOML document.
    ///
    /// Only the syntax is checked here; [`Evaluator::new`](crate::Evaluator::new)
    /// validates the values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load the config found by [`resolve_config_path`], or the defaults.
    ///
    /// Returns the path that was loaded, if any.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        match resolve_config_path(explicit) {
            Some(path) => {
                let config = Self::load(&path)?;
                info!(path = %path.display(), "loaded configuration");
                Ok((config, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Use a weight preset.
    pub fn with_preset(mut self, name: impl Into<String>) -> Self {
        self.weights = WeightSetting::Preset(name.into());
        self
    }

    /// Use a missing-value policy.
    pub const fn with_missing_policy(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }
}

/// Find the configuration file to load.
///
/// An explicit path wins, then a non-empty `$MTWB_CONFIG`; both are returned
/// even if the file does not exist, so a typo surfaces as an error. The user
/// config file is only returned when it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    resolve_with(explicit, std::env::var_os(CONFIG_ENV), dirs::config_dir())
}

fn resolve_with(
    explicit: Option<&Path>,
    env: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(value) = env.filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(value));
    }
    config_dir
        .map(|dir| dir.join("mtwb").join("config.toml"))
        .filter(|path| path.is_file())
}
