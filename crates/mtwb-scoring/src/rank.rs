//! Filtering and ordering of scored securities.

use crate::category::CategoryMap;
use crate::error::ParseError;
use crate::security::{InstrumentKind, ScoredSecurity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instrument-class filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentFilter {
    /// Stocks and ETFs
    #[default]
    Any,
    /// Stocks only
    Stock,
    /// ETFs only
    Etf,
}

impl InstrumentFilter {
    /// Whether `kind` passes the filter.
    pub const fn accepts(&self, kind: InstrumentKind) -> bool {
        match self {
            Self::Any => true,
            Self::Stock => matches!(kind, InstrumentKind::Stock),
            Self::Etf => matches!(kind, InstrumentKind::Etf),
        }
    }
}

impl From<InstrumentKind> for InstrumentFilter {
    fn from(kind: InstrumentKind) -> Self {
        match kind {
            InstrumentKind::Stock => Self::Stock,
            InstrumentKind::Etf => Self::Etf,
        }
    }
}

impl fmt::Display for InstrumentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Stock => write!(f, "stock"),
            Self::Etf => write!(f, "etf"),
        }
    }
}

impl FromStr for InstrumentFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "all" | "both" => Ok(Self::Any),
            other => other
                .parse::<InstrumentKind>()
                .map(Self::from)
                .map_err(|_| ParseError::InstrumentFilter(s.to_string())),
        }
    }
}

/// What to rank and how many to keep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankQuery {
    /// Category label; `None` or `"all"` keeps every category
    pub category: Option<String>,
    /// Instrument-class filter
    pub instrument: InstrumentFilter,
    /// Maximum number of entries
    pub limit: usize,
}

impl RankQuery {
    /// Query keeping the top `limit` of everything.
    pub const fn top(limit: usize) -> Self {
        Self {
            category: None,
            instrument: InstrumentFilter::Any,
            limit,
        }
    }

    /// Restrict to one category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to one instrument class.
    pub const fn with_instrument(mut self, instrument: InstrumentFilter) -> Self {
        self.instrument = instrument;
        self
    }

    fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
    }
}

impl Default for RankQuery {
    fn default() -> Self {
        Self::top(10)
    }
}

/// One position on the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry<'a> {
    /// 1-based position
    pub rank: usize,
    /// Resolved category label
    pub category: String,
    /// The scored security
    pub security: &'a ScoredSecurity,
}

/// Ordered ranking result. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedList<'a> {
    entries: Vec<RankedEntry<'a>>,
}

impl<'a> RankedList<'a> {
    /// Entries, best first.
    pub fn entries(&self) -> &[RankedEntry<'a>] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing matched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry<'a>> {
        self.entries.iter()
    }

    /// Symbols, best first.
    pub fn symbols(&self) -> Vec<&'a str> {
        self.entries.iter().map(|e| e.security.symbol()).collect()
    }
}

impl<'a> IntoIterator for RankedList<'a> {
    type Item = RankedEntry<'a>;
    type IntoIter = std::vec::IntoIter<RankedEntry<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Filters and orders scored securities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityRanker {
    categories: CategoryMap,
}

impl SecurityRanker {
    /// Create a ranker with a category taxonomy.
    pub fn new(categories: CategoryMap) -> Self {
        Self { categories }
    }

    /// Category taxonomy in use.
    pub const fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    /// Category label of one security.
    pub fn category_of(&self, security: &ScoredSecurity) -> &str {
        self.categories
            .resolve(security.kind(), security.raw().sector.as_deref())
    }

    /// Filter, sort by composite descending and truncate.
    ///
    /// Filters are conjunctive. Ties keep their input order. The result
    /// borrows `securities` only.
    pub fn rank<'a>(&self, securities: &'a [ScoredSecurity], query: &RankQuery) -> RankedList<'a> {
        let category = query.category_filter();

        let mut matched: Vec<(&str, &'a ScoredSecurity)> = securities
            .iter()
            .filter(|s| query.instrument.accepts(s.kind()))
            .map(|s| (self.category_of(s), s))
            .filter(|(label, _)| category.is_none_or(|c| label.eq_ignore_ascii_case(c)))
            .collect();

        matched.sort_by(|a, b| b.1.composite().total_cmp(&a.1.composite()));
        matched.truncate(query.limit);

        RankedList {
            entries: matched
                .into_iter()
                .enumerate()
                .map(|(i, (category, security))| RankedEntry {
                    rank: i + 1,
                    category: category.to_string(),
                    security,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse() {
        assert_eq!("ALL".parse::<InstrumentFilter>(), Ok(InstrumentFilter::Any));
        assert_eq!("etfs".parse::<InstrumentFilter>(), Ok(InstrumentFilter::Etf));
        assert_eq!("stock".parse::<InstrumentFilter>(), Ok(InstrumentFilter::Stock));
        assert!("bond".parse::<InstrumentFilter>().is_err());
    }

    #[test]
    fn test_filter_accepts() {
        assert!(InstrumentFilter::Any.accepts(InstrumentKind::Etf));
        assert!(InstrumentFilter::Stock.accepts(InstrumentKind::Stock));
        assert!(!InstrumentFilter::Stock.accepts(InstrumentKind::Etf));
    }

    #[test]
    fn test_all_category_is_no_filter() {
        assert_eq!(RankQuery::top(5).with_category("All").category_filter(), None);
        assert_eq!(RankQuery::top(5).with_category(" ").category_filter(), None);
        assert_eq!(
            RankQuery::top(5).with_category("Clinical").category_filter(),
            Some("Clinical")
        );
    }
}
