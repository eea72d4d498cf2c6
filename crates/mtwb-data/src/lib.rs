#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mtwb/mtwb-evaluator/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod file;
pub mod pipeline;
pub mod provider;
pub mod yahoo;

pub use error::{DataError, Result};
pub use file::{CsvProvider, write_snapshot, write_snapshot_file};
pub use pipeline::{Collection, DEFAULT_CONCURRENCY, FetchFailure, collect_universe};
pub use provider::{InMemoryProvider, Listing, MarketDataProvider};
pub use yahoo::YahooProvider;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
