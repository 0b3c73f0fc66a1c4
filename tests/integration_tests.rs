use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;
use tlmrs::seeder::Seeder;
use tlmrs::{
    AcwrCalculator, DailyLog, Database, ExerciseEntry, LoadHistoryPoint, RiskClassifier,
    RiskLevel, Set, SuggestionKey, TrainingDataFacade, VolumeCalculator, Workout,
};

/// Integration tests that run the store, ratio engine and classifier together

fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1)
        .unwrap()
        .checked_add_days(Days::new(n - 1))
        .unwrap()
}

fn session(date: NaiveDate, exercises: &[(&str, u32, Decimal, usize)]) -> Workout {
    Workout::new(
        date,
        exercises
            .iter()
            .map(|(name, reps, weight, set_count)| {
                ExerciseEntry::new(*name, vec![Set::new(*reps, *weight); *set_count])
            })
            .collect(),
    )
}

/// Load on day 1 only, nothing afterwards, evaluated 29 days later
#[test]
fn test_single_spike_then_nothing() {
    let mut history = vec![LoadHistoryPoint::new(day(1), dec!(5000))];
    history.extend((2..=30).map(|n| LoadHistoryPoint::new(day(n), Decimal::ZERO)));

    let calculator = AcwrCalculator::new();

    // Day 1 has left the 28-day window by day 30
    let day_30 = calculator.compute(&history, day(30));
    assert_eq!(day_30.acute_load, Decimal::ZERO);
    assert_eq!(day_30.chronic_load, Decimal::ZERO);
    assert_eq!(day_30.ratio, Decimal::ZERO);

    let risk = RiskClassifier::classify(day_30.ratio, 3, 7);
    assert_eq!(risk.suggestion_key, SuggestionKey::Decrease);
    assert_eq!(risk.risk_level_key, RiskLevel::Low);

    // On day 28 it is still the oldest day of the chronic window
    let day_28 = calculator.compute(&history, day(28));
    assert_eq!(day_28.acute_load, Decimal::ZERO);
    assert!((day_28.chronic_load - dec!(178.5714)).abs() < dec!(0.0001));
    assert_eq!(day_28.ratio, Decimal::ZERO);

    let risk = RiskClassifier::classify(day_28.ratio, 3, 7);
    assert_eq!(risk.suggestion_key, SuggestionKey::Decrease);
    assert_eq!(risk.risk_level_key, RiskLevel::Low);
}

#[test]
fn test_first_day_of_training() {
    let mut db = Database::in_memory().unwrap();
    let workout = session(day(1), &[("Squat", 5, dec!(100), 5), ("Bench", 5, dec!(70), 4)]);
    db.record_workout(workout, Some(4), Some(2)).unwrap();

    let facade = TrainingDataFacade::new(db);
    let dashboard = facade.load(day(1)).unwrap();
    let stats = &dashboard.stats;

    // 2500 + 1400
    assert_eq!(dashboard.today_log.as_ref().unwrap().daily_load, dec!(3900));
    assert_eq!(stats.acute_load, dec!(3900) / dec!(7));
    assert_eq!(stats.chronic_load, dec!(3900) / dec!(28));

    // Raw ratio of 4 dampened by one record out of 28
    let dampened = Decimal::ONE + dec!(3) / dec!(28);
    assert!((stats.ratio - dampened).abs() < dec!(0.000001));
    assert_eq!(stats.risk_level_key, RiskLevel::Optimal);
    assert_eq!(stats.suggestion_key, SuggestionKey::Optimal);
}

#[test]
fn test_multiple_sessions_sum_into_daily_load() {
    let mut db = Database::in_memory().unwrap();

    let morning = session(day(5), &[("Deadlift", 3, dec!(180), 3)]);
    let evening = session(day(5), &[("Pull Up", 8, dec!(0), 3), ("Curl", 12, dec!(15), 3)]);
    let expected = VolumeCalculator::daily_volume(&[morning.clone(), evening.clone()]);

    db.record_workout(morning, Some(3), Some(3)).unwrap();
    let log = db.record_workout(evening, None, None).unwrap();

    assert_eq!(expected, dec!(1620) + dec!(540));
    assert_eq!(log.daily_load, expected);
    assert_eq!(log.total_volume_load, expected);
    assert_eq!(log.workouts.len(), 2);
}

#[test]
fn test_rest_day_entries_behave_like_missing_days() {
    let base: Vec<DailyLog> = (1..=27)
        .map(|n| DailyLog::with_workouts(day(n), 4, 2, vec![session(day(n), &[("Row", 10, dec!(60), 5)])]))
        .collect();

    let mut with_rest = base.clone();
    with_rest.push(DailyLog::new(day(28), 4, 2));

    let facade_rest = TrainingDataFacade::new(with_rest);
    let facade_missing = TrainingDataFacade::new(base);

    let rest = facade_rest.load(day(28)).unwrap().stats;
    let missing = facade_missing.load(day(28)).unwrap().stats;

    assert_eq!(rest.acute_load, missing.acute_load);
    assert_eq!(rest.chronic_load, missing.chronic_load);
    // Same loads, but the rest day counts as a record for cold-start purposes
    assert_eq!(rest.ratio, rest.acute_load / rest.chronic_load);
}

#[test]
fn test_exhaustion_overrides_optimal_load() {
    let logs: Vec<DailyLog> = (1..=28)
        .map(|n| {
            let fatigue = if n == 28 { 5 } else { 2 };
            DailyLog::with_workouts(day(n), 4, fatigue, vec![session(day(n), &[("Press", 10, dec!(40), 3)])])
        })
        .collect();

    let facade = TrainingDataFacade::new(logs);
    let stats = facade.load(day(28)).unwrap().stats;

    assert_eq!(stats.ratio, Decimal::ONE);
    assert_eq!(stats.risk_level_key, RiskLevel::High);
    assert_eq!(stats.suggestion_key, SuggestionKey::FatigueWarning);
    assert!(stats.fatigue_warning);
}

#[test]
fn test_seeded_store_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tlm.db");
    let today = day(30);

    {
        let mut db = Database::new(&path).unwrap();
        let count = Seeder::seed(&mut db, today, 30, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(count, 31);
    }

    let facade = TrainingDataFacade::new(Database::new(&path).unwrap());
    let dashboard = facade.load(today).unwrap();
    assert_eq!(dashboard.logs.len(), 31);

    let stats = &dashboard.stats;
    assert!(stats.acute_load >= Decimal::ZERO);
    assert!(stats.chronic_load > Decimal::ZERO);
    assert_eq!(stats.ratio, stats.acute_load / stats.chronic_load);

    let expected = RiskClassifier::classify(
        stats.ratio,
        dashboard.logs.last().unwrap().fatigue,
        dashboard.logs.last().unwrap().sleep_quality,
    );
    assert_eq!(stats.risk_level_key, expected.risk_level_key);
    assert_eq!(stats.suggestion_key, expected.suggestion_key);

    let trend = facade.trend(today, 14).unwrap();
    assert_eq!(trend.len(), 14);
    assert_eq!(trend.last().unwrap().ratio, stats.ratio);
}
