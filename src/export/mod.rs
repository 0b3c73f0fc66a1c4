use crate::dashboard::{DashboardStats, TrendPoint};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub mod csv;
pub mod json;

/// Export format types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Result<Self, ExportError> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }

    /// Guess the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| Self::from_str(ext).ok())
    }
}

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] ::csv::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Snapshot of the dashboard written by `export`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub generated_at: DateTime<Utc>,
    pub stats: DashboardStats,
    pub trend: Vec<TrendPoint>,
}

impl TrainingReport {
    pub fn new(stats: DashboardStats, trend: Vec<TrendPoint>) -> Self {
        TrainingReport {
            generated_at: Utc::now(),
            stats,
            trend,
        }
    }
}

/// Write the report in the requested format.
///
/// CSV carries only the trend rows; JSON carries the whole report.
pub fn export_report<P: AsRef<Path>>(
    report: &TrainingReport,
    format: ExportFormat,
    output_path: P,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => csv::export_trend(&report.trend, output_path),
        ExportFormat::Json => json::export_json(report, output_path),
    }
}
