use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::acwr::AcwrConfig;
use crate::dashboard::WellnessDefaults;
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Ratio engine windows
    pub acwr: AcwrConfig,

    /// Wellness scores used before anything is logged
    pub wellness: WellnessDefaults,

    /// Logging output
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Data directory path
    pub data_dir: PathBuf,

    /// Database file name, relative to `data_dir`
    pub database_file: String,

    /// Days shown by the trend view
    pub trend_days: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            acwr: AcwrConfig::default(),
            wellness: WellnessDefaults::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tlmrs"),
            database_file: "tlm.db".to_string(),
            trend_days: 14,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tlmrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::debug!(
                    path = %config_path.display(),
                    error = %err,
                    "Config not loaded, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Reject settings the ratio engine or trend view cannot work with
    pub fn validate(&self) -> Result<()> {
        self.acwr
            .validate()
            .with_context(|| "Invalid [acwr] settings")?;

        if self.settings.trend_days == 0 {
            anyhow::bail!("settings.trend_days must be at least 1");
        }
        Ok(())
    }

    /// Full path of the log database
    pub fn database_path(&self) -> PathBuf {
        self.settings.data_dir.join(&self.settings.database_file)
    }
}
