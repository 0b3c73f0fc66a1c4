//! Error hierarchy for tlmrs
//!
//! The analytics functions are total and never fail; these errors belong to
//! the storage, configuration and export layers around them.

use thiserror::Error;

use crate::acwr::AcwrError;
use crate::export::ExportError;

/// Top-level error type for all tlmrs operations
#[derive(Debug, Error)]
pub enum TlmError {
    /// Log store errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Input rejected before it reached the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unparsable calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ratio engine errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] AcwrError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Log store errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt record for {date}: {reason}")]
    CorruptRecord { date: String, reason: String },

    #[error("Record not found: {0}")]
    NotFound(String),
}

impl From<rusqlite::Error> for TlmError {
    fn from(err: rusqlite::Error) -> Self {
        TlmError::Database(DatabaseError::Sqlite(err))
    }
}

/// Result type alias for tlmrs operations
pub type Result<T> = std::result::Result<T, TlmError>;

impl TlmError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TlmError::Validation(_) => ErrorSeverity::Warning,
            TlmError::InvalidDate(_) => ErrorSeverity::Warning,
            TlmError::Database(DatabaseError::NotFound(_)) => ErrorSeverity::Warning,
            TlmError::Database(DatabaseError::CorruptRecord { .. }) => ErrorSeverity::Critical,
            TlmError::Database(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            TlmError::Validation(reason) => format!("Entry rejected: {}", reason),
            TlmError::InvalidDate(value) => {
                format!("Could not read date '{}'. Use the YYYY-MM-DD format.", value)
            }
            TlmError::Database(DatabaseError::NotFound(date)) => {
                format!("No log saved for {}", date)
            }
            TlmError::Database(DatabaseError::CorruptRecord { date, .. }) => {
                format!("The saved log for {} could not be read.", date)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Critical,
    Error,
    Warning,
}

/// Severity and user-facing text for an error that ended a command.
///
/// The first [`TlmError`] in the chain decides both; anything else is shown
/// with its full context chain.
pub fn describe_failure(err: &anyhow::Error) -> (ErrorSeverity, String) {
    match err.chain().find_map(|cause| cause.downcast_ref::<TlmError>()) {
        Some(tlm) => (tlm.severity(), tlm.user_message()),
        None => (ErrorSeverity::Error, format!("{:#}", err)),
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TlmError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = TlmError::Validation("fatigue out of range".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = TlmError::Database(DatabaseError::CorruptRecord {
            date: "2024-09-01".to_string(),
            reason: "bad json".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_messages() {
        let err = TlmError::Database(DatabaseError::NotFound("2024-09-01".to_string()));
        assert!(err.user_message().contains("No log saved"));

        let err = parse_date("09/01/2024").unwrap_err();
        assert!(err.user_message().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_describe_failure() {
        let err = anyhow::Error::from(parse_date("tomorrow").unwrap_err());
        let (severity, message) = describe_failure(&err);
        assert_eq!(severity, ErrorSeverity::Warning);
        assert!(message.contains("YYYY-MM-DD"));

        let wrapped = anyhow::Error::from(TlmError::Database(DatabaseError::CorruptRecord {
            date: "2024-09-01".to_string(),
            reason: "bad json".to_string(),
        }))
        .context("Failed to load dashboard");
        let (severity, message) = describe_failure(&wrapped);
        assert_eq!(severity, ErrorSeverity::Critical);
        assert!(message.contains("could not be read"));

        let plain = anyhow::anyhow!("disk on fire").context("Failed to export");
        let (severity, message) = describe_failure(&plain);
        assert_eq!(severity, ErrorSeverity::Error);
        assert_eq!(message, "Failed to export: disk on fire");
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date(" 2024-02-29 ").unwrap();
        assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(parse_date("2023-02-29").is_err());
    }
}
