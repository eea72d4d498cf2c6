#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mtwb/mtwb-evaluator/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod breakdown;
pub mod export;
pub mod leaderboard;
pub mod report;
pub mod summary;

pub use breakdown::{ComponentLine, SecurityBreakdown};
pub use export::{ExportError, ExportFormat, Exporter};
pub use leaderboard::{Leaderboard, LeaderboardRow};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{LeaderboardSummary, ScoreMark, generate_summary};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
