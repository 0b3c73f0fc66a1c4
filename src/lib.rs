// Library interface for tlmrs modules
// This allows integration tests to access the core functionality

pub mod acwr;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod risk;
pub mod seeder;
pub mod volume;

// Re-export commonly used types for convenience
pub use models::*;
pub use acwr::{AcwrCalculator, AcwrConfig, AcwrResult, LoadHistoryIndex};
pub use dashboard::{Dashboard, DashboardStats, LogSource, TrainingDataFacade, TrendPoint};
pub use database::Database;
pub use error::{Result, TlmError};
pub use risk::{RiskAssessment, RiskClassifier, RiskLevel, SuggestionKey};
pub use volume::VolumeCalculator;
pub use logging::{LogConfig, LogFormat, LogLevel};
