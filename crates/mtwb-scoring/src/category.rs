//! Sector to category taxonomy.
//!
//! Provider sector labels are grouped into a small set of categories used for
//! filtering the leaderboard. The mapping is configuration: a
//! [`CategoryMap`] can be built from any table, and [`DefaultCategory`]
//! describes the built-in buckets.

use crate::security::InstrumentKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label for sectors without a bucket.
pub const OTHER_LABEL: &str = "Other";

/// Label for every ETF.
pub const ETF_LABEL: &str = "ETF";

/// Built-in category buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefaultCategory {
    /// Industrials, materials, energy, utilities, financials, real estate
    Industrial,

    /// Cyclical consumer, technology and communication services
    Consumer,

    /// Consumer staples
    ConsumerDefensive,

    /// Healthcare, biotech and pharma
    Clinical,
}

impl DefaultCategory {
    /// Returns all built-in categories.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Industrial,
            Self::Consumer,
            Self::ConsumerDefensive,
            Self::Clinical,
        ]
    }

    /// Returns the display label.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Industrial => "Industrial",
            Self::Consumer => "Consumer",
            Self::ConsumerDefensive => "Consumer Defensive",
            Self::Clinical => "Clinical",
        }
    }

    /// Returns the provider sector labels in this bucket.
    pub const fn sectors(&self) -> &'static [&'static str] {
        match self {
            Self::Industrial => &[
                "Industrials",
                "Basic Materials",
                "Energy",
                "Utilities",
                "Financial Services",
                "Real Estate",
            ],
            Self::Consumer => &["Consumer Cyclical", "Technology", "Communication Services"],
            Self::ConsumerDefensive => &["Consumer Defensive"],
            Self::Clinical => &["Healthcare", "Biotechnology", "Pharmaceuticals"],
        }
    }

    /// Find the bucket of a sector label.
    pub fn from_sector(sector: &str) -> Option<Self> {
        let sector = sector.trim();
        Self::all()
            .into_iter()
            .find(|c| c.sectors().iter().any(|s| s.eq_ignore_ascii_case(sector)))
    }
}

impl fmt::Display for DefaultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One bucket as written in a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CategoryEntry {
    name: String,
    #[serde(default)]
    sectors: Vec<String>,
}

/// Serialized form of a [`CategoryMap`].
///
/// Buckets are a sequence so declaration order survives a round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct CategoryTable {
    other: String,
    etf: String,
    buckets: Vec<CategoryEntry>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        CategoryMap::default().into()
    }
}

/// Resolves a security to its category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CategoryTable", into = "CategoryTable")]
pub struct CategoryMap {
    /// Lowercased sector -> category
    sectors: BTreeMap<String, String>,
    /// Categories in declaration order with their original sector labels
    buckets: Vec<(String, Vec<String>)>,
    other: String,
    etf: String,
}

impl CategoryMap {
    /// Build a map from `(category, sectors)` buckets.
    ///
    /// A sector listed under two buckets resolves to the later one.
    pub fn new<I, C, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<S>)>,
        C: Into<String>,
        S: Into<String>,
    {
        let buckets: Vec<(String, Vec<String>)> = buckets
            .into_iter()
            .map(|(category, sectors)| (category.into(), sectors.into_iter().map(Into::into).collect()))
            .collect();

        let sectors = buckets
            .iter()
            .flat_map(|(category, sectors)| {
                sectors
                    .iter()
                    .map(move |sector| (sector_key(sector), category.clone()))
            })
            .collect();

        Self {
            sectors,
            buckets,
            other: OTHER_LABEL.to_string(),
            etf: ETF_LABEL.to_string(),
        }
    }

    /// Set the label for unmapped sectors.
    pub fn with_other_label(mut self, label: impl Into<String>) -> Self {
        self.other = label.into();
        self
    }

    /// Set the label for ETFs.
    pub fn with_etf_label(mut self, label: impl Into<String>) -> Self {
        self.etf = label.into();
        self
    }

    /// Category of a security.
    ///
    /// ETFs always resolve to the ETF label. Absent or unmapped sectors
    /// resolve to the other label.
    pub fn resolve(&self, kind: InstrumentKind, sector: Option<&str>) -> &str {
        if kind.is_etf() {
            return &self.etf;
        }
        sector
            .and_then(|s| self.sectors.get(&sector_key(s)))
            .map_or(self.other.as_str(), String::as_str)
    }

    /// Configured buckets with their sector labels, in declaration order.
    pub fn buckets(&self) -> &[(String, Vec<String>)] {
        &self.buckets
    }

    /// Every label a security can resolve to.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.buckets.iter().map(|(c, _)| c.as_str()).collect();
        labels.push(&self.other);
        labels.push(&self.etf);
        labels.dedup();
        labels
    }

    /// Label for unmapped sectors.
    pub fn other_label(&self) -> &str {
        &self.other
    }

    /// Label for ETFs.
    pub fn etf_label(&self) -> &str {
        &self.etf
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::new(
            DefaultCategory::all()
                .into_iter()
                .map(|c| (c.name(), c.sectors().to_vec())),
        )
    }
}

impl From<CategoryTable> for CategoryMap {
    fn from(table: CategoryTable) -> Self {
        Self::new(table.buckets.into_iter().map(|entry| (entry.name, entry.sectors)))
            .with_other_label(table.other)
            .with_etf_label(table.etf)
    }
}

impl From<CategoryMap> for CategoryTable {
    fn from(map: CategoryMap) -> Self {
        Self {
            other: map.other,
            etf: map.etf,
            buckets: map
                .buckets
                .into_iter()
                .map(|(name, sectors)| CategoryEntry { name, sectors })
                .collect(),
        }
    }
}

fn sector_key(sector: &str) -> String {
    sector.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Technology", "Consumer")]
    #[case("Energy", "Industrial")]
    #[case("Financial Services", "Industrial")]
    #[case("Consumer Defensive", "Consumer Defensive")]
    #[case("healthcare", "Clinical")]
    #[case("Crypto Mining", "Other")]
    fn test_default_mapping(#[case] sector: &str, #[case] expected: &str) {
        let map = CategoryMap::default();
        assert_eq!(map.resolve(InstrumentKind::Stock, Some(sector)), expected);
    }

    #[test]
    fn test_absent_sector_is_other() {
        assert_eq!(CategoryMap::default().resolve(InstrumentKind::Stock, None), "Other");
    }

    #[test]
    fn test_etf_label_wins() {
        let map = CategoryMap::default();
        assert_eq!(map.resolve(InstrumentKind::Etf, Some("Technology")), "ETF");
    }

    #[test]
    fn test_default_category_lookup() {
        assert_eq!(DefaultCategory::all().len(), 4);
        assert_eq!(
            DefaultCategory::from_sector("Utilities"),
            Some(DefaultCategory::Industrial)
        );
        assert_eq!(DefaultCategory::from_sector("Unknown"), None);
        assert_eq!(DefaultCategory::ConsumerDefensive.to_string(), "Consumer Defensive");
    }

    #[test]
    fn test_custom_map() {
        let map = CategoryMap::new([("Tech", vec!["Technology", "Communication Services"])])
            .with_other_label("Everything Else");
        assert_eq!(map.resolve(InstrumentKind::Stock, Some("technology")), "Tech");
        assert_eq!(map.resolve(InstrumentKind::Stock, Some("Energy")), "Everything Else");
        assert_eq!(map.labels(), vec!["Tech", "Everything Else", "ETF"]);
    }

    #[test]
    fn test_serde_table_shape() {
        let json = r#"{"buckets":[{"name":"Green","sectors":["Utilities"]}],"other":"Misc"}"#;
        let map: CategoryMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.resolve(InstrumentKind::Stock, Some("Utilities")), "Green");
        assert_eq!(map.resolve(InstrumentKind::Stock, Some("Energy")), "Misc");
        assert_eq!(map.etf_label(), "ETF");
    }

    #[test]
    fn test_serde_keeps_declaration_order() {
        let map = CategoryMap::new([
            ("Zeta", vec!["Energy", "Utilities"]),
            ("Alpha", vec!["Technology"]),
            ("Mid", vec!["energy"]),
        ]);
        assert_eq!(map.resolve(InstrumentKind::Stock, Some("Energy")), "Mid");

        let json = serde_json::to_string(&map).unwrap();
        let parsed: CategoryMap = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, map);
        assert_eq!(parsed.labels(), vec!["Zeta", "Alpha", "Mid", "Other", "ETF"]);
        assert_eq!(parsed.resolve(InstrumentKind::Stock, Some("Energy")), "Mid");
        assert_eq!(parsed.resolve(InstrumentKind::Stock, Some("Utilities")), "Zeta");
    }
}
