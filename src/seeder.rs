//! Demo history generator

use chrono::{Days, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use tracing::info;

use crate::database::Database;
use crate::error::Result;
use crate::models::{DailyLog, ExerciseEntry, Set, Workout};

const LIFTS: [&str; 4] = ["Back Squat", "Bench Press", "Deadlift", "Overhead Press"];
const SETS_PER_SESSION: u32 = 5;
const REPS_PER_SET: u32 = 5;

/// Longest history `generate` will produce, about ten years
pub const MAX_SEED_DAYS: u32 = 3650;

pub struct Seeder;

impl Seeder {
    /// Generate `days + 1` logs ending at `today`, oldest first. `days` is
    /// capped at [`MAX_SEED_DAYS`].
    ///
    /// Volume starts around 5000 and climbs by 50 a day with ±500 noise;
    /// roughly one day in five is a rest day.
    pub fn generate<R: Rng>(today: NaiveDate, days: u32, rng: &mut R) -> Vec<DailyLog> {
        let days = days.min(MAX_SEED_DAYS);
        let mut logs = Vec::new();

        for offset in (0..=days).rev() {
            let Some(date) = today.checked_sub_days(Days::new(offset as u64)) else {
                continue;
            };

            if rng.gen::<f64>() > 0.8 {
                logs.push(DailyLog::new(date, 8, 2));
                continue;
            }

            let elapsed = (days - offset) as i64;
            let noise = rng.gen_range(-500i64..=500);
            let volume = Decimal::from((5000 + elapsed * 50 + noise).max(0));

            let lift = LIFTS[(elapsed as usize) % LIFTS.len()];
            let weight = (volume / Decimal::from(SETS_PER_SESSION * REPS_PER_SET)).round_dp(1);
            let sets = (0..SETS_PER_SESSION)
                .map(|_| Set::new(REPS_PER_SET, weight))
                .collect();
            let workout = Workout::new(date, vec![ExerciseEntry::new(lift, sets)]);

            logs.push(DailyLog::with_workouts(
                date,
                rng.gen_range(5..=10),
                rng.gen_range(1..=5),
                vec![workout],
            ));
        }

        logs
    }

    /// Replace everything in the store with generated history
    pub fn seed<R: Rng>(
        db: &mut Database,
        today: NaiveDate,
        days: u32,
        rng: &mut R,
    ) -> Result<usize> {
        let logs = Self::generate(today, days, rng);
        let count = db.replace_all(&logs)?;

        info!(count, %today, "Seeded demo history");
        Ok(count)
    }
}
