//! Ticker universes.
//!
//! A universe is the list of listings evaluated together. Scores are relative
//! to the universe, so the same ticker can score differently in another one.

pub mod default;

pub use default::{DEFAULT_ETFS, DEFAULT_STOCKS, DefaultUniverse};

use mtwb_data::Listing;
use mtwb_scoring::InstrumentKind;

/// Trait for ticker universes.
pub trait Universe {
    /// Get every listing, in evaluation order.
    fn listings(&self) -> Vec<Listing>;

    /// Get all symbols.
    fn symbols(&self) -> Vec<String> {
        self.listings().into_iter().map(|l| l.symbol).collect()
    }

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_ascii_uppercase();
        self.listings().iter().any(|l| l.symbol == symbol)
    }

    /// Get the number of listings.
    fn size(&self) -> usize {
        self.listings().len()
    }
}

/// An explicit list of listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListedUniverse {
    listings: Vec<Listing>,
}

impl ListedUniverse {
    /// Universe of the given listings; repeated symbols keep the first.
    pub fn new(listings: impl IntoIterator<Item = Listing>) -> Self {
        let mut universe = Self::default();
        for listing in listings {
            universe.push(listing);
        }
        universe
    }

    /// Universe of bare tickers. A ticker known as an ETF in `reference` is
    /// listed as an ETF, anything else as a stock.
    pub fn from_symbols<I, S>(symbols: I, reference: &DefaultUniverse) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            symbols
                .into_iter()
                .filter(|s| !s.as_ref().trim().is_empty())
                .map(|s| Listing::new(s.as_ref(), reference.kind_of(s.as_ref()).unwrap_or(InstrumentKind::Stock))),
        )
    }

    /// Append a listing unless its symbol is already present.
    pub fn push(&mut self, listing: Listing) {
        if !self.listings.iter().any(|l| l.symbol == listing.symbol) {
            self.listings.push(listing);
        }
    }
}

impl Universe for ListedUniverse {
    fn listings(&self) -> Vec<Listing> {
        self.listings.clone()
    }
}

impl Universe for DefaultUniverse {
    fn listings(&self) -> Vec<Listing> {
        self.listings()
    }
}
