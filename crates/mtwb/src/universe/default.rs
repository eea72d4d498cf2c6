//! The built-in MTWB universe: large-cap US stocks and a broad ETF list.

use mtwb_data::Listing;
use mtwb_scoring::InstrumentKind;
use std::collections::HashSet;

/// Default stock tickers.
pub const DEFAULT_STOCKS: &[&str] = &[
    "AAPL", "MSFT", "AMZN", "GOOGL", "META", "TSLA", "BRK-B", "JNJ", "V", "JPM", "PG", "NVDA", "HD",
    "MA", "DIS", "UNH", "VZ", "NFLX", "PFE", "KO", "PEP", "INTC", "MRK", "WMT", "CSCO", "NKE", "XOM",
    "BA", "ABBV", "CVX", "COST", "T", "LLY", "ORCL", "MCD", "ADBE", "WFC", "IBM", "MDT", "HON",
    "BMY", "QCOM", "C", "TXN", "ABT", "CRM", "UNP", "GS", "AMGN", "CAT", "GILD", "AXP", "LMT", "MS",
    "BKNG", "ISRG", "CVS", "DE", "BLK", "TMO", "GE", "UPS", "LOW", "AMAT", "SPGI", "PLD", "USB",
    "NOW", "SCHW", "VRTX", "MO", "NEE", "RTX", "PYPL", "ADI", "COP", "PM", "MU", "SO", "DHR", "MMC",
    "SBUX", "CI", "BDX", "MDLZ", "ICE", "ZTS", "PNC", "APD", "DUK", "REGN", "CME", "GM", "F", "TGT",
    "CL", "EW", "ETN", "NSC", "FDX", "MRNA", "ILMN", "KMB", "LRCX", "EOG", "MMM", "CSX",
];

/// Default ETF tickers.
pub const DEFAULT_ETFS: &[&str] = &[
    "ARKK", "GRID", "FAN", "PAVE", "TAN", "PHO", "PBW", "IBB", "DGRO", "ESGU", "ICLN", "INDA", "EWW",
    "EWT", "ITA", "BBCA", "XLU", "ESGV", "VWO", "VHT", "VNQ", "VTI", "VT", "VSS", "VNQI", "MSOS",
    "IPO", "JEPI", "COWZ", "LCTU", "XLC", "XLP", "XLE", "XLF", "XLV", "XLI", "RSP", "ESGE", "EWA",
    "EWZ", "MCHI", "DSI", "USMV", "QUAL", "ESGD", "MOAT", "VEU", "VEA", "VGK", "VOO", "VXUS", "XLB",
    "XLY", "QQQ", "MTUM", "IWF", "XLK", "SMH", "VUG", "VGT", "IWD", "NOBL", "SCHD", "VIG", "VYM",
    "VTV", "IJH", "VO", "IJR", "IWM", "AVUV", "AGG", "JPST", "BSV", "BND", "BNDX", "FTSL", "HYLS",
    "IGSB", "FALN", "HYG", "LQD", "JNK", "VCIT", "VCSH", "SHY", "TLT", "IEF", "EMB", "SHV", "GOVT",
    "BIL", "VGSH", "USFR", "EMLC", "VTIP", "TIP", "MBB", "MUB", "VTEB",
];

/// The built-in universe of stocks followed by ETFs.
#[derive(Debug, Clone)]
pub struct DefaultUniverse {
    stocks: Vec<String>,
    etfs: Vec<String>,
    etf_set: HashSet<String>,
}

impl DefaultUniverse {
    /// Create the default universe.
    pub fn new() -> Self {
        Self::from_lists(DEFAULT_STOCKS, DEFAULT_ETFS)
    }

    /// Create a universe from explicit stock and ETF lists.
    pub fn from_lists<S: AsRef<str>>(stocks: &[S], etfs: &[S]) -> Self {
        let clean = |list: &[S]| -> Vec<String> {
            list.iter()
                .map(|s| s.as_ref().trim().to_ascii_uppercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        let etfs = clean(etfs);
        Self {
            stocks: clean(stocks),
            etf_set: etfs.iter().cloned().collect(),
            etfs,
        }
    }

    /// Keep at most `stocks` stocks and `etfs` ETFs, in list order.
    pub fn truncated(mut self, stocks: usize, etfs: usize) -> Self {
        self.stocks.truncate(stocks);
        self.etfs.truncate(etfs);
        self.etf_set = self.etfs.iter().cloned().collect();
        self
    }

    /// Stock tickers.
    pub fn stocks(&self) -> &[String] {
        &self.stocks
    }

    /// ETF tickers.
    pub fn etfs(&self) -> &[String] {
        &self.etfs
    }

    /// Instrument class of a listed ticker, `None` if not listed.
    pub fn kind_of(&self, symbol: &str) -> Option<InstrumentKind> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if self.etf_set.contains(&symbol) {
            Some(InstrumentKind::Etf)
        } else if self.stocks.contains(&symbol) {
            Some(InstrumentKind::Stock)
        } else {
            None
        }
    }

    /// Stocks first, then ETFs.
    pub fn listings(&self) -> Vec<Listing> {
        self.stocks
            .iter()
            .map(Listing::stock)
            .chain(self.etfs.iter().map(Listing::etf))
            .collect()
    }
}

impl Default for DefaultUniverse {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universe_creation() {
        let universe = DefaultUniverse::new();
        assert_eq!(universe.stocks().len(), DEFAULT_STOCKS.len());
        assert_eq!(universe.etfs().len(), DEFAULT_ETFS.len());
        assert!(universe.stocks().len() >= 100);
        assert!(universe.etfs().len() >= 100);
    }

    #[test]
    fn test_lists_are_disjoint_and_unique() {
        let stocks: HashSet<_> = DEFAULT_STOCKS.iter().collect();
        let etfs: HashSet<_> = DEFAULT_ETFS.iter().collect();
        assert_eq!(stocks.len(), DEFAULT_STOCKS.len());
        assert_eq!(etfs.len(), DEFAULT_ETFS.len());
        assert!(stocks.is_disjoint(&etfs));
    }

    #[test]
    fn test_kind_lookup() {
        let universe = DefaultUniverse::new();
        assert_eq!(universe.kind_of("icln"), Some(InstrumentKind::Etf));
        assert_eq!(universe.kind_of("KO"), Some(InstrumentKind::Stock));
        assert_eq!(universe.kind_of("NOTREAL"), None);
    }

    #[test]
    fn test_listing_order() {
        let universe = DefaultUniverse::new().truncated(2, 1);
        assert_eq!(
            universe.listings(),
            vec![Listing::stock("AAPL"), Listing::stock("MSFT"), Listing::etf("ARKK")]
        );
        assert_eq!(universe.kind_of("ICLN"), None);
    }
}
