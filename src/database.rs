use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{DatabaseError, Result, TlmError};
use crate::models::{DailyLog, Workout};

/// SQLite-backed store of daily logs, one row per calendar date
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Create or open a database at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path.as_ref())?;
        let db = Self { conn };
        db.init_schema()?;

        debug!(path = %db_path.as_ref().display(), "Opened log database");
        Ok(db)
    }

    /// Open a throwaway in-memory database
    pub fn in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS daily_logs (
                date TEXT PRIMARY KEY,
                sleep_quality INTEGER NOT NULL,
                fatigue INTEGER NOT NULL,
                workouts_json TEXT NOT NULL,
                total_volume_load TEXT NOT NULL,
                daily_load TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Insert the log, replacing any existing log for the same date.
    ///
    /// Totals are recomputed from the workouts before writing.
    pub fn save_daily_log(&mut self, log: &DailyLog) -> Result<()> {
        let mut log = log.clone();
        log.recompute_totals();
        log.validate()?;

        Self::insert_log(&self.conn, &log)?;

        debug!(
            date = %log.date,
            workouts = log.workouts.len(),
            daily_load = %log.daily_load,
            "Saved daily log"
        );
        Ok(())
    }

    /// All logs, oldest first
    pub fn get_daily_logs(&self) -> Result<Vec<DailyLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, sleep_quality, fatigue, workouts_json FROM daily_logs ORDER BY date ASC",
        )?;
        let rows = stmt.query_map([], Self::raw_from_row)?;

        let mut logs = Vec::new();
        for row in rows {
            logs.push(Self::log_from_raw(row?)?);
        }
        Ok(logs)
    }

    pub fn get_log_for_date(&self, date: NaiveDate) -> Result<Option<DailyLog>> {
        let raw = self
            .conn
            .query_row(
                "SELECT date, sleep_quality, fatigue, workouts_json FROM daily_logs WHERE date = ?1",
                params![date],
                Self::raw_from_row,
            )
            .optional()?;

        raw.map(Self::log_from_raw).transpose()
    }

    /// Like [`get_log_for_date`](Self::get_log_for_date), but a missing day is an error
    pub fn require_log_for_date(&self, date: NaiveDate) -> Result<DailyLog> {
        self.get_log_for_date(date)?
            .ok_or_else(|| DatabaseError::NotFound(date.to_string()).into())
    }

    /// Append a finished workout to its day, creating the day if needed.
    ///
    /// Wellness scores replace the stored ones only when given; a new day
    /// requires both.
    pub fn record_workout(
        &mut self,
        workout: Workout,
        sleep_quality: Option<u8>,
        fatigue: Option<u8>,
    ) -> Result<DailyLog> {
        let date = workout.date;
        let log = match self.get_log_for_date(date)? {
            Some(mut existing) => {
                if let Some(sleep) = sleep_quality {
                    existing.sleep_quality = sleep;
                }
                if let Some(fatigue) = fatigue {
                    existing.fatigue = fatigue;
                }
                existing.add_workout(workout);
                existing
            }
            None => match (sleep_quality, fatigue) {
                (Some(sleep), Some(fatigue)) => {
                    DailyLog::with_workouts(date, sleep, fatigue, vec![workout])
                }
                _ => {
                    return Err(TlmError::Validation(format!(
                        "sleep and fatigue are required to start the log for {}",
                        date
                    )))
                }
            },
        };

        self.save_daily_log(&log)?;
        info!(date = %date, daily_load = %log.daily_load, "Recorded workout");
        Ok(log)
    }

    /// Delete the log for `date`. Returns false when nothing was stored.
    pub fn delete_log(&mut self, date: NaiveDate) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM daily_logs WHERE date = ?1", params![date])?;
        Ok(removed > 0)
    }

    pub fn clear_all(&mut self) -> Result<usize> {
        let removed = self.conn.execute("DELETE FROM daily_logs", [])?;
        info!(removed, "Cleared all daily logs");
        Ok(removed)
    }

    /// Swap the whole store for `logs` in one transaction. On any failure
    /// the previous contents are left untouched.
    pub fn replace_all(&mut self, logs: &[DailyLog]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM daily_logs", [])?;

        for log in logs {
            let mut log = log.clone();
            log.recompute_totals();
            log.validate()?;
            Self::insert_log(&tx, &log)?;
        }

        tx.commit()?;
        info!(removed, inserted = logs.len(), "Replaced all daily logs");
        Ok(logs.len())
    }

    pub fn log_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM daily_logs", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn insert_log(conn: &Connection, log: &DailyLog) -> Result<()> {
        let workouts_json = serde_json::to_string(&log.workouts)?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO daily_logs
                (date, sleep_quality, fatigue, workouts_json, total_volume_load, daily_load, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                log.date,
                log.sleep_quality,
                log.fatigue,
                workouts_json,
                log.total_volume_load.to_string(),
                log.daily_load.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn raw_from_row(row: &Row) -> rusqlite::Result<RawLog> {
        Ok(RawLog {
            date: row.get(0)?,
            sleep_quality: row.get(1)?,
            fatigue: row.get(2)?,
            workouts_json: row.get(3)?,
        })
    }

    fn log_from_raw(raw: RawLog) -> Result<DailyLog> {
        let workouts: Vec<Workout> =
            serde_json::from_str(&raw.workouts_json).map_err(|e| DatabaseError::CorruptRecord {
                date: raw.date.to_string(),
                reason: e.to_string(),
            })?;

        Ok(DailyLog::with_workouts(
            raw.date,
            raw.sleep_quality,
            raw.fatigue,
            workouts,
        ))
    }
}

struct RawLog {
    date: NaiveDate,
    sleep_quality: u8,
    fatigue: u8,
    workouts_json: String,
}
