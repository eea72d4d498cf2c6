//! CSV and JSON export of leaderboards, breakdowns and summaries.

use crate::breakdown::SecurityBreakdown;
use crate::leaderboard::{Leaderboard, LeaderboardRow};
use crate::summary::LeaderboardSummary;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized bytes were not UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty" | "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn to_csv<'a, T, I>(records: I) -> Result<String, ExportError>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in records {
        wtr.serialize(record)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: ExportFormat) -> Result<String, ExportError> {
    Ok(match format {
        ExportFormat::PrettyJson => serde_json::to_string_pretty(value)?,
        _ => serde_json::to_string(value)?,
    })
}

/// One row of a breakdown in CSV form.
#[derive(Debug, Serialize)]
struct ComponentRecord<'a> {
    symbol: &'a str,
    component: &'a str,
    raw_value: Option<f64>,
    score: f64,
    weight: f64,
    contribution: f64,
}

/// One row of a summary in CSV form.
#[derive(Debug, Serialize)]
struct SummaryRecord {
    metric: String,
    value: String,
}

impl Exporter for Leaderboard {
    /// CSV holds the rows only; JSON keeps the title too.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(&self.rows),
            _ => to_json(self, format),
        }
    }
}

impl Exporter for [LeaderboardRow] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => to_csv(self),
            _ => to_json(self, format),
        }
    }
}

impl Exporter for SecurityBreakdown {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let records: Vec<_> = self
                    .components
                    .iter()
                    .map(|line| ComponentRecord {
                        symbol: &self.symbol,
                        component: line.sub_score.key(),
                        raw_value: line.raw_value,
                        score: line.score,
                        weight: line.weight,
                        contribution: line.contribution,
                    })
                    .collect();
                to_csv(&records)
            }
            _ => to_json(self, format),
        }
    }
}

impl Exporter for LeaderboardSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut records = vec![
                    SummaryRecord::new("count", self.count),
                    SummaryRecord::new("stocks", self.stocks),
                    SummaryRecord::new("etfs", self.etfs),
                    SummaryRecord::new("average_composite", format!("{:.4}", self.average_composite)),
                    SummaryRecord::new("esg_leaders", self.esg_leaders),
                ];
                if let Some(best) = &self.best {
                    records.push(SummaryRecord::new("best", best));
                }
                if let Some(worst) = &self.worst {
                    records.push(SummaryRecord::new("worst", worst));
                }
                records.extend(
                    self.categories
                        .iter()
                        .map(|(label, count)| SummaryRecord::new(format!("category:{label}"), count)),
                );
                to_csv(&records)
            }
            _ => to_json(self, format),
        }
    }
}

impl SummaryRecord {
    fn new(metric: impl Into<String>, value: impl ToString) -> Self {
        Self {
            metric: metric.into(),
            value: value.to_string(),
        }
    }
}
