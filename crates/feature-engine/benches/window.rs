//! Window aggregation benchmark over a month of 10-minute telemetry

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{LagBuilder, WindowAggregator};
use timeseries::Table;

fn month_of_telemetry(columns: usize) -> Table {
    let start = NaiveDate::from_ymd_opt(2014, 5, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let names: Vec<String> = (0..columns).map(|i| format!("sensor_{i}")).collect();
    let mut table = Table::new(names);

    for tick in 0..(30 * 24 * 6) {
        let values = (0..columns)
            .map(|c| Some(((tick * (c + 1)) % 97) as f64))
            .collect();
        let _ = table.push_row(start + Duration::minutes(10 * tick as i64), values);
    }
    table
}

fn bench_window(c: &mut Criterion) {
    let table = month_of_telemetry(60);
    let aggregator = WindowAggregator::default();
    c.bench_function("window_2hr_60_columns", |b| {
        b.iter(|| aggregator.aggregate(black_box(&table)))
    });
}

fn bench_lags(c: &mut Criterion) {
    let table = month_of_telemetry(60);
    let builder = LagBuilder::default();
    c.bench_function("lags_6_60_columns", |b| b.iter(|| builder.build(black_box(&table))));
}

criterion_group!(benches, bench_window, bench_lags);
criterion_main!(benches);
