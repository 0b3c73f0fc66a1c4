//! Volume load calculations
//!
//! Volume load (reps × weight summed over sets) is the load measure the
//! ratio engine works on. RPE is recorded per set but does not contribute.

use rust_decimal::Decimal;

use crate::models::{Set, Workout};

/// Stateless volume load calculator
pub struct VolumeCalculator;

impl VolumeCalculator {
    /// Sum of `reps * weight` over all sets. Empty input yields zero.
    pub fn volume_load(sets: &[Set]) -> Decimal {
        sets.iter()
            .map(|set| Decimal::from(set.reps) * set.weight)
            .sum()
    }

    /// Volume load of every exercise of every workout on a day
    pub fn daily_volume(workouts: &[Workout]) -> Decimal {
        workouts
            .iter()
            .flat_map(|workout| workout.exercises.iter())
            .map(|exercise| Self::volume_load(&exercise.sets))
            .sum()
    }
}
