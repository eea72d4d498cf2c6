//! Per-symbol ESG inputs with a fallback for symbols not in the table.

use super::{EsgInputs, NEUTRAL_COMPONENT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ratings drawn by the seeded fallback.
const SEEDED_RATINGS: [&str; 5] = ["AAA", "AA", "A", "BBB", "BB"];

/// (symbol, rating, carbon, community, initiatives)
const SAMPLE: [(&str, &str, u8, u8, &str); 25] = [
    ("AAPL", "AA", 85, 90, "Education technology programs, environmental conservation"),
    ("MSFT", "AA", 88, 85, "Digital skills training, accessibility programs"),
    ("GOOGL", "A", 90, 80, "STEM education, digital literacy programs"),
    ("META", "BBB", 75, 70, "Digital connectivity, small business support"),
    ("TSLA", "A", 95, 75, "Sustainable transportation, renewable energy education"),
    ("JNJ", "AA", 70, 95, "Healthcare access, vaccine equity programs"),
    ("V", "A", 65, 85, "Financial inclusion, economic empowerment"),
    ("JPM", "BBB", 60, 80, "Financial literacy, affordable housing"),
    ("PG", "AA", 80, 90, "Clean water access, disaster relief"),
    ("NVDA", "A", 70, 75, "AI for social good, STEM education"),
    ("WMT", "BBB", 75, 85, "Food security, workforce development"),
    ("KO", "BBB", 70, 80, "Water stewardship, women's empowerment"),
    ("PEP", "A", 75, 85, "Agricultural development, nutrition programs"),
    ("INTC", "BBB", 80, 70, "Technology education, digital inclusion"),
    ("MRK", "A", 65, 90, "Global health access, disease prevention"),
    ("HD", "A", 70, 85, "Affordable housing, veteran support"),
    ("MA", "A", 60, 80, "Financial inclusion, digital payments"),
    ("DIS", "BBB", 65, 90, "Children's programs, environmental education"),
    ("UNH", "BBB", 55, 75, "Healthcare access, wellness programs"),
    ("VZ", "BBB", 70, 70, "Digital inclusion, STEM education"),
    ("NFLX", "A", 80, 75, "Diverse content creation, accessibility"),
    ("PFE", "AA", 60, 95, "Global health, vaccine equity"),
    ("XOM", "BB", 30, 60, "STEM education, energy education"),
    ("BA", "BB", 45, 70, "STEM education, aerospace programs"),
    ("CVX", "BB", 35, 65, "STEM education, community development"),
];

/// Inputs used for a symbol missing from the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EsgFallback {
    /// No rating, carbon 50, community 50.
    #[default]
    Neutral,

    /// The same configured record for every unknown symbol.
    Fixed {
        /// Rating letter
        rating: String,
        /// Carbon score
        carbon: u8,
        /// Community score
        community: u8,
    },

    /// Pseudo-random inputs, stable per symbol and seed.
    Seeded {
        /// Base seed, mixed with the symbol
        seed: u64,
    },
}

impl EsgFallback {
    /// Inputs for `symbol` under this fallback.
    pub fn inputs_for(&self, symbol: &str) -> EsgInputs {
        match self {
            Self::Neutral => EsgInputs {
                rating: None,
                carbon: Some(NEUTRAL_COMPONENT),
                community: Some(NEUTRAL_COMPONENT),
                initiatives: None,
            },
            Self::Fixed {
                rating,
                carbon,
                community,
            } => EsgInputs::new(rating.clone(), *carbon, *community),
            Self::Seeded { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed ^ symbol_hash(symbol));
                let rating = SEEDED_RATINGS.choose(&mut rng).copied().unwrap_or("BBB");
                let carbon = rng.gen_range(40..=90);
                let community = rng.gen_range(50..=95);
                EsgInputs::new(rating, carbon, community)
            }
        }
    }
}

/// ESG inputs keyed by symbol.
///
/// Symbols are matched case-insensitively. A lookup never fails: symbols
/// without an entry resolve through the [`EsgFallback`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DirectoryTable", into = "DirectoryTable")]
pub struct EsgDirectory {
    entries: BTreeMap<String, EsgInputs>,
    fallback: EsgFallback,
}

/// Serialized form of an [`EsgDirectory`]. Keys are normalized on the way in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct DirectoryTable {
    entries: BTreeMap<String, EsgInputs>,
    fallback: EsgFallback,
}

impl From<DirectoryTable> for EsgDirectory {
    fn from(table: DirectoryTable) -> Self {
        let mut directory = Self::new().with_fallback(table.fallback);
        directory.extend(table.entries);
        directory
    }
}

impl From<EsgDirectory> for DirectoryTable {
    fn from(directory: EsgDirectory) -> Self {
        Self {
            entries: directory.entries,
            fallback: directory.fallback,
        }
    }
}

impl EsgDirectory {
    /// Empty directory with the neutral fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory preloaded with 25 large caps.
    pub fn sample() -> Self {
        let entries = SAMPLE
            .iter()
            .map(|(symbol, rating, carbon, community, note)| {
                (
                    (*symbol).to_string(),
                    EsgInputs::new(*rating, *carbon, *community).with_initiatives(*note),
                )
            })
            .collect();
        Self {
            entries,
            fallback: EsgFallback::default(),
        }
    }

    /// Replace the fallback.
    pub fn with_fallback(mut self, fallback: EsgFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, symbol: &str, inputs: EsgInputs) -> Option<EsgInputs> {
        self.entries.insert(symbol_key(symbol), inputs)
    }

    /// Entry for `symbol`, if present.
    pub fn get(&self, symbol: &str) -> Option<&EsgInputs> {
        self.entries.get(&symbol_key(symbol))
    }

    /// Entry for `symbol`, or the fallback inputs.
    pub fn lookup(&self, symbol: &str) -> EsgInputs {
        match self.get(symbol) {
            Some(inputs) => inputs.clone(),
            None => self.fallback.inputs_for(&symbol_key(symbol)),
        }
    }

    /// Whether `symbol` has an entry.
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(&symbol_key(symbol))
    }

    /// Fallback in use.
    pub const fn fallback(&self) -> &EsgFallback {
        &self.fallback
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EsgInputs)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Extend<(String, EsgInputs)> for EsgDirectory {
    fn extend<T: IntoIterator<Item = (String, EsgInputs)>>(&mut self, iter: T) {
        for (symbol, inputs) in iter {
            self.insert(&symbol, inputs);
        }
    }
}

fn symbol_key(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

// FNV-1a, stable across platforms and releases.
fn symbol_hash(symbol: &str) -> u64 {
    symbol.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_contents() {
        let directory = EsgDirectory::sample();
        assert_eq!(directory.len(), 25);

        let aapl = directory.get("aapl").unwrap();
        assert_eq!(aapl.rating.as_deref(), Some("AA"));
        assert_eq!(aapl.carbon, Some(85));
        assert_eq!(aapl.community, Some(90));
        assert!(aapl.initiatives.as_deref().unwrap().contains("Education"));

        let xom = directory.get("XOM").unwrap();
        assert_eq!(xom.rating.as_deref(), Some("BB"));
    }

    #[test]
    fn test_neutral_fallback() {
        let inputs = EsgDirectory::sample().lookup("ZZZZ");
        assert_eq!(inputs.rating, None);
        assert_eq!(inputs.carbon, Some(50));
        assert_eq!(inputs.community, Some(50));
    }

    #[test]
    fn test_fixed_fallback() {
        let directory = EsgDirectory::new().with_fallback(EsgFallback::Fixed {
            rating: "BBB".to_string(),
            carbon: 65,
            community: 70,
        });
        let inputs = directory.lookup("NEW");
        assert_eq!(inputs, EsgInputs::new("BBB", 65, 70));
    }

    #[test]
    fn test_seeded_fallback_is_stable() {
        let directory = EsgDirectory::new().with_fallback(EsgFallback::Seeded { seed: 42 });
        let first = directory.lookup("ABC");
        let second = directory.lookup("abc");
        assert_eq!(first, second);

        for symbol in ["ABC", "DEF", "GHI", "JKL", "MNO"] {
            let inputs = directory.lookup(symbol);
            let rating = inputs.rating.unwrap();
            assert!(SEEDED_RATINGS.contains(&rating.as_str()));
            assert!((40..=90).contains(&inputs.carbon.unwrap()));
            assert!((50..=95).contains(&inputs.community.unwrap()));
        }
    }

    #[test]
    fn test_insert_overrides_sample() {
        let mut directory = EsgDirectory::sample();
        let previous = directory.insert("aapl", EsgInputs::new("AAA", 99, 99));
        assert!(previous.is_some());
        assert_eq!(directory.lookup("AAPL").carbon, Some(99));
        assert_eq!(directory.len(), 25);
    }

    #[test]
    fn test_fallback_toml_shape() {
        let fallback: EsgFallback = serde_json::from_str(r#"{"kind":"seeded","seed":7}"#).unwrap();
        assert_eq!(fallback, EsgFallback::Seeded { seed: 7 });
    }

    #[test]
    fn test_deserialized_keys_are_normalized() {
        let json = r#"{"entries":{" aapl ":{"rating":"AAA","carbon":99,"community":98}}}"#;
        let directory: EsgDirectory = serde_json::from_str(json).unwrap();
        assert!(directory.contains("AAPL"));
        assert_eq!(directory.get("AAPL").unwrap().carbon, Some(99));
        assert_eq!(directory.iter().next().unwrap().0, "AAPL");
        assert_eq!(directory.fallback(), &EsgFallback::Neutral);

        let json = serde_json::to_string(&directory).unwrap();
        let reparsed: EsgDirectory = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, directory);
    }
}
