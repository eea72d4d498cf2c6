//! Composite weight table.
//!
//! A [`WeightTable`] always holds one finite, non-negative weight per
//! [`SubScore`] and the weights always sum to 1.0 (within
//! [`WEIGHT_TOLERANCE`]). Construction is the only place this is checked, so
//! a table that exists is a table that can be scored with.

use crate::error::ConfigError;
use crate::security::SubScore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Allowed deviation of a weight sum from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Names accepted by [`WeightTable::preset`].
pub const PRESETS: [&str; 2] = ["mtwb", "growth"];

// valuation, risk, income, profitability, efficiency, growth, esg
const MTWB: [f64; 7] = [0.10, 0.20, 0.20, 0.10, 0.10, 0.10, 0.20];
const GROWTH_RAW: [f64; 7] = [0.08, 0.20, 0.12, 0.08, 0.12, 0.25, 0.25];

/// Validated weights of the seven composite components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct WeightTable {
    weights: [f64; 7],
}

impl WeightTable {
    /// Build a table from one entry per sub-score.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate or missing entry, a negative or non-finite
    /// weight, or a sum other than 1.0.
    pub fn new<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (SubScore, f64)>,
    {
        let mut slots: [Option<f64>; 7] = [None; 7];
        for (sub_score, weight) in entries {
            let slot = &mut slots[sub_score.index()];
            if slot.is_some() {
                return Err(ConfigError::DuplicateWeight(sub_score));
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight { sub_score, weight });
            }
            *slot = Some(weight);
        }

        let mut weights = [0.0; 7];
        for sub_score in SubScore::ALL {
            weights[sub_score.index()] =
                slots[sub_score.index()].ok_or(ConfigError::MissingWeight(sub_score))?;
        }

        let total: f64 = weights.iter().sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightSum(total));
        }
        Ok(Self { weights })
    }

    /// Build a table from names, accepting the legacy column names.
    ///
    /// # Errors
    ///
    /// As [`WeightTable::new`], plus [`ConfigError::UnknownSubScore`] for a
    /// name that is not a sub-score.
    pub fn from_named<I, K>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let parsed = entries
            .into_iter()
            .map(|(name, weight)| {
                name.as_ref()
                    .parse::<SubScore>()
                    .map(|sub_score| (sub_score, weight))
                    .map_err(|_| ConfigError::UnknownSubScore(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(parsed)
    }

    /// Default MTWB weighting: risk, income and ESG at 20%, the rest at 10%.
    pub const fn mtwb() -> Self {
        Self { weights: MTWB }
    }

    /// Growth-tilted weighting (growth and ESG lead, valuation trails).
    pub fn growth() -> Self {
        let total: f64 = GROWTH_RAW.iter().sum();
        Self {
            weights: GROWTH_RAW.map(|w| w / total),
        }
    }

    /// Look up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] for an unknown name.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mtwb" | "default" => Ok(Self::mtwb()),
            "growth" => Ok(Self::growth()),
            _ => Err(ConfigError::UnknownPreset {
                name: name.to_string(),
                available: PRESETS.join(", "),
            }),
        }
    }

    /// Weight of one component.
    pub const fn get(&self, sub_score: SubScore) -> f64 {
        self.weights[sub_score.index()]
    }

    /// Components and weights in table order.
    pub fn iter(&self) -> impl Iterator<Item = (SubScore, f64)> + '_ {
        SubScore::ALL.iter().map(|s| (*s, self.get(*s)))
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Weighted sum of per-component scores.
    pub fn apply(&self, score: impl Fn(SubScore) -> f64) -> f64 {
        self.iter().map(|(sub_score, weight)| score(sub_score) * weight).sum()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::mtwb()
    }
}

impl TryFrom<BTreeMap<String, f64>> for WeightTable {
    type Error = ConfigError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_named(map)
    }
}

impl From<WeightTable> for BTreeMap<String, f64> {
    fn from(table: WeightTable) -> Self {
        table
            .iter()
            .map(|(sub_score, weight)| (sub_score.key().to_string(), weight))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn entries(weights: [f64; 7]) -> Vec<(SubScore, f64)> {
        SubScore::ALL.iter().copied().zip(weights).collect()
    }

    #[rstest]
    #[case::mtwb(WeightTable::mtwb())]
    #[case::growth(WeightTable::growth())]
    fn test_presets_validate(#[case] table: WeightTable) {
        let rebuilt = WeightTable::new(table.iter()).unwrap();
        assert_relative_eq!(rebuilt.total(), 1.0, epsilon = WEIGHT_TOLERANCE);
    }

    #[test]
    fn test_mtwb_values() {
        let table = WeightTable::default();
        assert_relative_eq!(table.get(SubScore::Risk), 0.20);
        assert_relative_eq!(table.get(SubScore::Esg), 0.20);
        assert_relative_eq!(table.get(SubScore::Growth), 0.10);
    }

    #[test]
    fn test_growth_keeps_proportions() {
        let table = WeightTable::growth();
        assert_relative_eq!(
            table.get(SubScore::Growth) / table.get(SubScore::Valuation),
            0.25 / 0.08,
            epsilon = 1e-9
        );
    }

    #[rstest]
    #[case::short(0.9)]
    #[case::long(1.1)]
    fn test_rejects_bad_sum(#[case] target: f64) {
        let mut weights = MTWB;
        weights[1] += target - 1.0;
        let err = WeightTable::new(entries(weights)).unwrap_err();
        assert!(matches!(err, ConfigError::WeightSum(_)));
    }

    #[test]
    fn test_rejects_missing_entry() {
        let partial: Vec<_> = entries(MTWB).into_iter().take(6).collect();
        let err = WeightTable::new(partial).unwrap_err();
        assert_eq!(err, ConfigError::MissingWeight(SubScore::Esg));
    }

    #[test]
    fn test_rejects_duplicate_and_negative() {
        let mut duplicated = entries(MTWB);
        duplicated.push((SubScore::Risk, 0.0));
        assert_eq!(
            WeightTable::new(duplicated).unwrap_err(),
            ConfigError::DuplicateWeight(SubScore::Risk)
        );

        let mut negative = entries(MTWB);
        negative[0].1 = -0.1;
        assert!(matches!(
            WeightTable::new(negative),
            Err(ConfigError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_single_component_table() {
        let mut weights = [0.0; 7];
        weights[SubScore::Valuation.index()] = 1.0;
        let table = WeightTable::new(entries(weights)).unwrap();
        assert_relative_eq!(table.apply(|s| if s == SubScore::Valuation { 80.0 } else { 10.0 }), 80.0);
    }

    #[test]
    fn test_named_entries_accept_legacy_keys() {
        let table = WeightTable::from_named([
            ("pe_score", 0.10),
            ("volatility_score", 0.20),
            ("dividend_score", 0.20),
            ("profit_score", 0.10),
            ("roe_score", 0.10),
            ("growth_score", 0.10),
            ("esg_score", 0.20),
        ])
        .unwrap();
        assert_eq!(table, WeightTable::mtwb());

        let err = WeightTable::from_named([("momentum", 1.0)]).unwrap_err();
        assert_eq!(err, ConfigError::UnknownSubScore("momentum".to_string()));
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(WeightTable::preset("MTWB").unwrap(), WeightTable::mtwb());
        assert!(matches!(
            WeightTable::preset("aggressive"),
            Err(ConfigError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn test_serde_map_shape() {
        let json = serde_json::to_string(&WeightTable::mtwb()).unwrap();
        assert!(json.contains("\"valuation\":0.1"));

        let parsed: WeightTable = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, WeightTable::mtwb());

        let bad = r#"{"valuation":0.5,"risk":0.5,"income":0.5,"profitability":0,"efficiency":0,"growth":0,"esg":0}"#;
        assert!(serde_json::from_str::<WeightTable>(bad).is_err());
    }
}
