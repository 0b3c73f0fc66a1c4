use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TlmError};
use crate::volume::VolumeCalculator;

/// A single resistance-training set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    /// Repetitions completed
    pub reps: u32,

    /// Load lifted for each repetition
    pub weight: Decimal,

    /// Rate of Perceived Exertion (0-10), recorded but not part of volume load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<Decimal>,
}

impl Set {
    pub fn new(reps: u32, weight: Decimal) -> Self {
        Set {
            reps,
            weight,
            rpe: None,
        }
    }

    pub fn with_rpe(reps: u32, weight: Decimal, rpe: Decimal) -> Self {
        Set {
            reps,
            weight,
            rpe: Some(rpe),
        }
    }
}

/// One exercise within a workout, sets kept in entry order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub exercise_name: String,
    pub sets: Vec<Set>,
}

impl ExerciseEntry {
    pub fn new(exercise_name: impl Into<String>, sets: Vec<Set>) -> Self {
        ExerciseEntry {
            exercise_name: exercise_name.into(),
            sets,
        }
    }
}

/// A training session. A calendar day may hold several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Unique, time-ordered identifier
    pub id: String,

    /// Calendar day the session belongs to
    pub date: NaiveDate,

    pub exercises: Vec<ExerciseEntry>,

    /// Session RPE (1-10)
    #[serde(rename = "sessionRPE", default, skip_serializing_if = "Option::is_none")]
    pub session_rpe: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Workout {
    /// Create a workout with a fresh time-derived id (UUID v7)
    pub fn new(date: NaiveDate, exercises: Vec<ExerciseEntry>) -> Self {
        Workout {
            id: uuid::Uuid::now_v7().to_string(),
            date,
            exercises,
            session_rpe: None,
            duration_minutes: None,
            notes: None,
        }
    }

    /// Volume load of this session alone
    pub fn volume_load(&self) -> Decimal {
        self.exercises
            .iter()
            .map(|exercise| VolumeCalculator::volume_load(&exercise.sets))
            .sum()
    }
}

/// Wellness and training record for one calendar date.
///
/// `daily_load` and `total_volume_load` always equal the daily volume of
/// `workouts`; every mutator below recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: NaiveDate,

    /// Sleep quality, 1 (terrible) upwards
    pub sleep_quality: u8,

    /// Fatigue, 1 (fresh) upwards
    pub fatigue: u8,

    pub workouts: Vec<Workout>,

    pub total_volume_load: Decimal,

    pub daily_load: Decimal,
}

impl DailyLog {
    /// New log with no workouts (an explicit rest day)
    pub fn new(date: NaiveDate, sleep_quality: u8, fatigue: u8) -> Self {
        DailyLog {
            date,
            sleep_quality,
            fatigue,
            workouts: Vec::new(),
            total_volume_load: Decimal::ZERO,
            daily_load: Decimal::ZERO,
        }
    }

    /// Build a log from workouts, computing the totals
    pub fn with_workouts(
        date: NaiveDate,
        sleep_quality: u8,
        fatigue: u8,
        workouts: Vec<Workout>,
    ) -> Self {
        let mut log = DailyLog::new(date, sleep_quality, fatigue);
        log.set_workouts(workouts);
        log
    }

    pub fn add_workout(&mut self, workout: Workout) {
        self.workouts.push(workout);
        self.recompute_totals();
    }

    pub fn set_workouts(&mut self, workouts: Vec<Workout>) {
        self.workouts = workouts;
        self.recompute_totals();
    }

    pub fn recompute_totals(&mut self) {
        let volume = VolumeCalculator::daily_volume(&self.workouts);
        self.total_volume_load = volume;
        self.daily_load = volume;
    }

    pub fn is_rest_day(&self) -> bool {
        self.workouts.is_empty()
    }

    /// Project into the input record the ratio engine consumes
    pub fn to_history_point(&self) -> LoadHistoryPoint {
        LoadHistoryPoint {
            date: self.date,
            load: self.daily_load,
        }
    }

    /// Input validation performed before a log is persisted.
    ///
    /// The analytics functions never call this; they assume validated data.
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.sleep_quality) {
            return Err(TlmError::Validation(format!(
                "sleep quality must be between 1 and 10, got {}",
                self.sleep_quality
            )));
        }
        if !(1..=10).contains(&self.fatigue) {
            return Err(TlmError::Validation(format!(
                "fatigue must be between 1 and 10, got {}",
                self.fatigue
            )));
        }

        for workout in &self.workouts {
            if workout.date != self.date {
                return Err(TlmError::Validation(format!(
                    "workout {} is dated {} but belongs to the log for {}",
                    workout.id, workout.date, self.date
                )));
            }
            for exercise in &workout.exercises {
                for set in &exercise.sets {
                    if set.weight < Decimal::ZERO {
                        return Err(TlmError::Validation(format!(
                            "negative weight {} in {}",
                            set.weight, exercise.exercise_name
                        )));
                    }
                    if let Some(rpe) = set.rpe {
                        if rpe < Decimal::ZERO || rpe > Decimal::TEN {
                            return Err(TlmError::Validation(format!(
                                "RPE must be between 0 and 10, got {} in {}",
                                rpe, exercise.exercise_name
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// A (date, load) pair fed to the ratio engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadHistoryPoint {
    pub date: NaiveDate,
    pub load: Decimal,
}

impl LoadHistoryPoint {
    pub fn new(date: NaiveDate, load: Decimal) -> Self {
        LoadHistoryPoint { date, load }
    }
}
