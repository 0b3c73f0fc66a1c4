//! Dashboard aggregation over the stored logs
//!
//! [`TrainingDataFacade`] sequences the pieces: read every log, project the
//! history, compute the ratio for today, pick the wellness inputs from the
//! most recent log and classify.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::acwr::{AcwrCalculator, AcwrConfig, AcwrResult, LoadHistoryIndex};
use crate::database::Database;
use crate::error::Result;
use crate::models::{DailyLog, LoadHistoryPoint};
use crate::risk::{RiskAssessment, RiskClassifier, RiskLevel, SuggestionKey};

/// Anything that can hand out the full set of daily logs
pub trait LogSource {
    fn daily_logs(&self) -> Result<Vec<DailyLog>>;
}

impl LogSource for Database {
    fn daily_logs(&self) -> Result<Vec<DailyLog>> {
        self.get_daily_logs()
    }
}

impl LogSource for [DailyLog] {
    fn daily_logs(&self) -> Result<Vec<DailyLog>> {
        Ok(self.to_vec())
    }
}

impl LogSource for Vec<DailyLog> {
    fn daily_logs(&self) -> Result<Vec<DailyLog>> {
        Ok(self.clone())
    }
}

/// Wellness scores assumed when nothing has been logged yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellnessDefaults {
    pub sleep: u8,
    pub fatigue: u8,
}

impl Default for WellnessDefaults {
    fn default() -> Self {
        WellnessDefaults {
            sleep: 7,
            fatigue: 3,
        }
    }
}

/// Today's load figures and classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub date: NaiveDate,
    pub acute_load: Decimal,
    pub chronic_load: Decimal,
    pub ratio: Decimal,
    pub suggestion_key: SuggestionKey,
    pub risk_level_key: RiskLevel,
    pub fatigue_warning: bool,
}

impl DashboardStats {
    fn from_parts(date: NaiveDate, acwr: AcwrResult, risk: RiskAssessment) -> Self {
        DashboardStats {
            date,
            acute_load: acwr.acute_load,
            chronic_load: acwr.chronic_load,
            ratio: acwr.ratio,
            suggestion_key: risk.suggestion_key,
            risk_level_key: risk.risk_level_key,
            fatigue_warning: risk.fatigue_warning,
        }
    }
}

/// Everything the home screen needs in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub today_log: Option<DailyLog>,
    pub logs: Vec<DailyLog>,
}

/// One day of the volume/ratio chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub volume: Decimal,
    pub ratio: Decimal,
}

pub struct TrainingDataFacade<S> {
    source: S,
    calculator: AcwrCalculator,
    defaults: WellnessDefaults,
}

impl<S: LogSource> TrainingDataFacade<S> {
    pub fn new(source: S) -> Self {
        TrainingDataFacade {
            source,
            calculator: AcwrCalculator::new(),
            defaults: WellnessDefaults::default(),
        }
    }

    pub fn with_settings(source: S, acwr: AcwrConfig, defaults: WellnessDefaults) -> Result<Self> {
        Ok(TrainingDataFacade {
            source,
            calculator: AcwrCalculator::with_config(acwr)?,
            defaults,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Read every log and build today's dashboard
    #[instrument(skip(self))]
    pub fn load(&self, today: NaiveDate) -> Result<Dashboard> {
        let logs = self.source.daily_logs()?;
        let stats = self.stats_for(&logs, today);
        let today_log = logs.iter().find(|log| log.date == today).cloned();

        debug!(
            logs = logs.len(),
            ratio = %stats.ratio,
            risk = %stats.risk_level_key,
            "Dashboard computed"
        );

        Ok(Dashboard {
            stats,
            today_log,
            logs,
        })
    }

    /// Stats for `today` from an already loaded log set
    pub fn stats_for(&self, logs: &[DailyLog], today: NaiveDate) -> DashboardStats {
        let history: Vec<LoadHistoryPoint> = logs.iter().map(DailyLog::to_history_point).collect();
        let acwr = self.calculator.compute(&history, today);

        let (sleep, fatigue) = logs
            .iter()
            .max_by_key(|log| log.date)
            .map(|latest| (latest.sleep_quality, latest.fatigue))
            .unwrap_or((self.defaults.sleep, self.defaults.fatigue));

        let risk = RiskClassifier::classify(acwr.ratio, fatigue, sleep);
        DashboardStats::from_parts(today, acwr, risk)
    }

    /// Daily volume and ratio for the `days` days ending at `today`, oldest first
    #[instrument(skip(self))]
    pub fn trend(&self, today: NaiveDate, days: u16) -> Result<Vec<TrendPoint>> {
        let logs = self.source.daily_logs()?;
        self.trend_for(&logs, today, days)
    }

    pub fn trend_for(
        &self,
        logs: &[DailyLog],
        today: NaiveDate,
        days: u16,
    ) -> Result<Vec<TrendPoint>> {
        if days == 0 {
            return Ok(Vec::new());
        }

        let history: Vec<LoadHistoryPoint> = logs.iter().map(DailyLog::to_history_point).collect();
        let index = LoadHistoryIndex::from_points(&history);
        let start = today
            .checked_sub_days(Days::new(days as u64 - 1))
            .unwrap_or(NaiveDate::MIN);

        let series = self.calculator.compute_series(&history, start, today)?;
        Ok(series
            .into_iter()
            .map(|point| TrendPoint {
                date: point.date,
                volume: index.load_on(point.date),
                ratio: point.result.ratio,
            })
            .collect())
    }
}
