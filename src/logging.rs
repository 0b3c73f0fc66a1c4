//! Structured logging for tlmrs
//!
//! Human-readable or JSON output on stderr, with an optional JSON log file
//! that can rotate daily.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,

    /// Stderr format (pretty, json, compact). The log file is always JSON.
    pub format: LogFormat,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Rotate the log file daily
    pub rotation: bool,

    /// Include span enter/close events
    pub include_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            file_path: None,
            rotation: true,
            include_spans: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const ORDER: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// Directive name understood by [`EnvFilter`]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Step `verbosity` levels more detailed, stopping at trace
    pub fn raised_by(self, verbosity: u8) -> LogLevel {
        let current = Self::ORDER.iter().position(|level| *level == self).unwrap_or(1);
        Self::ORDER[(current + verbosity as usize).min(Self::ORDER.len() - 1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tlmrs={}", config.level.as_str())));

    let mut layers = vec![stderr_layer(config)];
    if let Some(path) = &config.file_path {
        layers.push(file_layer(config, path)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    tracing::debug!(
        level = config.level.as_str(),
        format = ?config.format,
        file = ?config.file_path,
        "Logging initialized"
    );
    Ok(())
}

fn span_events(config: &LogConfig) -> FmtSpan {
    if config.include_spans {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn stderr_layer(config: &LogConfig) -> BoxedLayer {
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    match config.format {
        LogFormat::Pretty => layer
            .with_line_number(true)
            .with_span_events(span_events(config))
            .boxed(),
        LogFormat::Compact => layer
            .compact()
            .with_span_events(span_events(config))
            .boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(config.include_spans)
            .with_span_list(config.include_spans)
            .boxed(),
    }
}

fn file_layer(config: &LogConfig, path: &Path) -> anyhow::Result<BoxedLayer> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_current_span(config.include_spans)
        .with_span_list(config.include_spans);

    if config.rotation {
        let prefix = path.file_name().unwrap_or_else(|| OsStr::new("tlmrs.log"));
        let appender = tracing_appender::rolling::daily(dir, prefix);
        Ok(layer.with_writer(appender).boxed())
    } else {
        let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(layer.with_writer(Arc::new(file)).boxed())
    }
}
