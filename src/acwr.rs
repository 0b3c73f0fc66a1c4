use crate::models::LoadHistoryPoint;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// ACWR calculation errors
#[derive(Error, Debug)]
pub enum AcwrError {
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Window lengths and cold-start threshold for the ratio engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcwrConfig {
    /// Acute window in days (default: 7)
    pub acute_window_days: u16,

    /// Chronic window in days (default: 28). Also the history length below
    /// which cold-start dampening applies.
    pub chronic_window_days: u16,

    /// Raw ratio above which a short history gets dampened (default: 1.5)
    pub dampening_threshold: Decimal,
}

impl Default for AcwrConfig {
    fn default() -> Self {
        AcwrConfig {
            acute_window_days: 7,
            chronic_window_days: 28,
            dampening_threshold: dec!(1.5),
        }
    }
}

impl AcwrConfig {
    pub fn validate(&self) -> Result<(), AcwrError> {
        if self.acute_window_days == 0 || self.chronic_window_days == 0 {
            return Err(AcwrError::ConfigurationError(
                "window lengths must be at least one day".to_string(),
            ));
        }
        if self.acute_window_days > self.chronic_window_days {
            return Err(AcwrError::ConfigurationError(format!(
                "acute window ({}) must not exceed chronic window ({})",
                self.acute_window_days, self.chronic_window_days
            )));
        }
        if self.dampening_threshold < Decimal::ONE {
            return Err(AcwrError::ConfigurationError(format!(
                "dampening threshold must be at least 1.0, got {}",
                self.dampening_threshold
            )));
        }
        Ok(())
    }
}

/// Acute/chronic loads and their ratio for one date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcwrResult {
    /// Mean load over the acute window
    pub acute_load: Decimal,

    /// Mean load over the chronic window
    pub chronic_load: Decimal,

    /// Acute:chronic ratio after cold-start correction
    pub ratio: Decimal,
}

impl AcwrResult {
    pub fn zero() -> Self {
        AcwrResult {
            acute_load: Decimal::ZERO,
            chronic_load: Decimal::ZERO,
            ratio: Decimal::ZERO,
        }
    }
}

/// Ratio result tagged with the date it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcwrPoint {
    pub date: NaiveDate,
    pub result: AcwrResult,
}

/// Date → load lookup built from a history snapshot.
///
/// Dates absent from the history resolve to zero. Duplicate dates keep the
/// last value supplied.
#[derive(Debug, Clone, Default)]
pub struct LoadHistoryIndex {
    loads: HashMap<NaiveDate, Decimal>,
    record_count: usize,
}

impl LoadHistoryIndex {
    pub fn from_points(history: &[LoadHistoryPoint]) -> Self {
        let mut loads = HashMap::with_capacity(history.len());
        for point in history {
            loads.insert(point.date, point.load);
        }

        LoadHistoryIndex {
            loads,
            record_count: history.len(),
        }
    }

    /// Load recorded for `date`, zero when there is no record
    pub fn load_on(&self, date: NaiveDate) -> Decimal {
        self.loads.get(&date).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.loads.contains_key(&date)
    }

    /// Number of history records supplied, duplicates included
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Distinct dates known to the index
    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Sum of loads over `days` calendar days ending at `end` inclusive
    pub fn window_sum(&self, end: NaiveDate, days: u16) -> Decimal {
        (0..days as u64)
            .filter_map(|offset| end.checked_sub_days(Days::new(offset)))
            .map(|date| self.load_on(date))
            .sum()
    }
}

/// Acute:chronic workload ratio engine
pub struct AcwrCalculator {
    config: AcwrConfig,
}

impl AcwrCalculator {
    /// Create new calculator with the standard 7/28-day windows
    pub fn new() -> Self {
        AcwrCalculator {
            config: AcwrConfig::default(),
        }
    }

    /// Create new calculator with custom windows, rejecting configs that
    /// [`AcwrConfig::validate`] refuses
    pub fn with_config(config: AcwrConfig) -> Result<Self, AcwrError> {
        config.validate()?;
        Ok(AcwrCalculator { config })
    }

    pub fn config(&self) -> &AcwrConfig {
        &self.config
    }

    /// Compute acute load, chronic load and ratio for `target_date`
    pub fn compute(&self, history: &[LoadHistoryPoint], target_date: NaiveDate) -> AcwrResult {
        let index = LoadHistoryIndex::from_points(history);
        self.compute_with_index(&index, target_date)
    }

    /// Same as [`compute`](Self::compute) over a prebuilt index
    pub fn compute_with_index(&self, index: &LoadHistoryIndex, target_date: NaiveDate) -> AcwrResult {
        let acute_days = self.config.acute_window_days;
        let chronic_days = self.config.chronic_window_days;

        // Missing days count as zero, so denominators are the fixed window lengths
        let acute_load = index.window_sum(target_date, acute_days) / Decimal::from(acute_days);
        let chronic_load =
            index.window_sum(target_date, chronic_days) / Decimal::from(chronic_days);

        let raw_ratio = Self::raw_ratio(acute_load, chronic_load);
        let ratio = self.dampen(raw_ratio, index.record_count());

        AcwrResult {
            acute_load,
            chronic_load,
            ratio,
        }
    }

    /// Ratio for every date in `[start_date, end_date]`, oldest first
    pub fn compute_series(
        &self,
        history: &[LoadHistoryPoint],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<AcwrPoint>, AcwrError> {
        if start_date > end_date {
            return Err(AcwrError::InvalidDateRange(
                "Start date must be before end date".to_string(),
            ));
        }

        let index = LoadHistoryIndex::from_points(history);
        let series = start_date
            .iter_days()
            .take_while(|date| *date <= end_date)
            .map(|date| AcwrPoint {
                date,
                result: self.compute_with_index(&index, date),
            })
            .collect();

        Ok(series)
    }

    /// Acute over chronic, with a neutral 1.0 when chronic is zero but acute is not
    fn raw_ratio(acute_load: Decimal, chronic_load: Decimal) -> Decimal {
        if chronic_load.is_zero() {
            if acute_load > Decimal::ZERO {
                Decimal::ONE
            } else {
                Decimal::ZERO
            }
        } else {
            acute_load / chronic_load
        }
    }

    /// Pull a spiking ratio toward 1.0 in proportion to how little history exists
    fn dampen(&self, ratio: Decimal, history_len: usize) -> Decimal {
        let full_history = self.config.chronic_window_days as usize;
        if history_len >= full_history || ratio <= self.config.dampening_threshold {
            return ratio;
        }

        let coverage = Decimal::from(history_len as u64) / Decimal::from(full_history as u64);
        Decimal::ONE + (ratio - Decimal::ONE) * coverage
    }
}

impl Default for AcwrCalculator {
    fn default() -> Self {
        Self::new()
    }
}
