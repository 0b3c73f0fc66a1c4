use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;
use tlmrs::{
    AcwrCalculator, DailyLog, ExerciseEntry, LoadHistoryPoint, RiskClassifier, Set,
    TrainingDataFacade, Workout,
};

/// Benchmarks for the ratio engine over growing histories

fn create_history(days: u64) -> Vec<LoadHistoryPoint> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..days)
        .map(|offset| {
            let load = if offset % 5 == 4 { 0 } else { 4000 + (offset % 30) * 50 };
            LoadHistoryPoint::new(
                start.checked_add_days(Days::new(offset)).unwrap(),
                Decimal::from(load),
            )
        })
        .collect()
}

fn bench_acwr(c: &mut Criterion) {
    let mut group = c.benchmark_group("ACWR");
    let calculator = AcwrCalculator::new();

    for &days in &[7u64, 30, 365, 1825] {
        let history = create_history(days);
        let target = history.last().unwrap().date;

        group.throughput(Throughput::Elements(days));
        group.bench_with_input(BenchmarkId::new("compute", days), &history, |b, history| {
            b.iter(|| calculator.compute(black_box(history), black_box(target)));
        });
    }

    group.finish();
}

fn bench_trend(c: &mut Criterion) {
    let history = create_history(365);
    let logs: Vec<DailyLog> = history
        .iter()
        .map(|point| {
            let sets = vec![Set::new(1, point.load)];
            let workout = Workout::new(point.date, vec![ExerciseEntry::new("Squat", sets)]);
            DailyLog::with_workouts(point.date, 4, 2, vec![workout])
        })
        .collect();
    let today = logs.last().unwrap().date;
    let facade = TrainingDataFacade::new(logs);

    c.bench_function("trend_14_days", |b| {
        b.iter(|| facade.trend(black_box(today), 14))
    });
}

fn bench_classifier(c: &mut Criterion) {
    c.bench_function("classify", |b| {
        b.iter(|| RiskClassifier::classify(black_box(Decimal::new(125, 2)), black_box(4), black_box(2)))
    });
}

criterion_group!(benches, bench_acwr, bench_trend, bench_classifier);
criterion_main!(benches);
