//! Timestamped JSON reports.

use crate::leaderboard::Leaderboard;
use crate::summary::LeaderboardSummary;
use chrono::{DateTime, Utc};
use mtwb_scoring::WeightTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Builder was missing a required part.
    #[error("Report is missing its {0}")]
    Incomplete(&'static str),
}

/// A leaderboard snapshot with the settings that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report title
    pub title: String,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Weight table in force
    pub weights: WeightTable,

    /// Securities evaluated, including those filtered out of the leaderboard
    pub universe_size: usize,

    /// Tickers that could not be fetched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,

    /// The ranked table
    pub leaderboard: Leaderboard,

    /// Market overview
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<LeaderboardSummary>,
}

impl Report {
    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    title: Option<String>,
    weights: Option<WeightTable>,
    universe_size: Option<usize>,
    failed: Vec<String>,
    leaderboard: Option<Leaderboard>,
    summary: Option<LeaderboardSummary>,
    timestamp: Option<DateTime<Utc>>,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title; defaults to the leaderboard title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the weight table; defaults to the MTWB preset.
    pub const fn weights(mut self, weights: WeightTable) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Set the number of securities evaluated.
    pub const fn universe_size(mut self, size: usize) -> Self {
        self.universe_size = Some(size);
        self
    }

    /// Record tickers that failed to fetch.
    pub fn failed<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failed.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Set the leaderboard.
    pub fn leaderboard(mut self, leaderboard: Leaderboard) -> Self {
        self.leaderboard = Some(leaderboard);
        self
    }

    /// Attach a market overview.
    pub fn summary(mut self, summary: LeaderboardSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Fix the timestamp instead of using the build time.
    pub const fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build the report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Incomplete`] without a leaderboard.
    pub fn build(self) -> Result<Report, ReportError> {
        let leaderboard = self.leaderboard.ok_or(ReportError::Incomplete("leaderboard"))?;
        Ok(Report {
            title: self.title.unwrap_or_else(|| leaderboard.title.clone()),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            weights: self.weights.unwrap_or_default(),
            universe_size: self.universe_size.unwrap_or(leaderboard.rows.len()),
            failed: self.failed,
            leaderboard,
            summary: self.summary,
        })
    }
}
