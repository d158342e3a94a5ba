//! Criterion benchmarks for the pipeline hot paths.
//!
//! Benchmarks:
//! 1. Cleaning (parse + sort + dedup) on shuffled raw input
//! 2. Exact-date alignment of a daily series
//! 3. Forward-fill alignment of a monthly series
//!
//! Alignment must stay O(series + calendar); a regression to re-scanning
//! shows up here immediately.

use chrono::{Datelike, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use crashlab_core::domain::{CleanedSeries, Frequency, Observation, RawObservation};
use crashlab_core::pipeline::align::{align_to_calendar, establish_calendar};
use crashlab_core::pipeline::clean_series;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 3).unwrap()
}

fn make_daily(id: &str, n: usize) -> CleanedSeries {
    let mut observations = Vec::with_capacity(n);
    let mut current = base_date();
    while observations.len() < n {
        if !matches!(
            current.weekday(),
            chrono::Weekday::Sat | chrono::Weekday::Sun
        ) {
            let value = 100.0 + (observations.len() as f64 * 0.1).sin() * 10.0;
            observations.push(Observation::new(current, Some(value)));
        }
        current += chrono::Duration::days(1);
    }
    CleanedSeries {
        id: id.to_string(),
        observations,
        frequency: Frequency::Daily,
    }
}

fn make_monthly(id: &str, months: usize) -> CleanedSeries {
    let observations = (0..months)
        .map(|i| {
            let year = 2000 + (i / 12) as i32;
            let month = (i % 12) as u32 + 1;
            Observation::new(
                NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
                Some(50.0 + i as f64 * 0.2),
            )
        })
        .collect();
    CleanedSeries {
        id: id.to_string(),
        observations,
        frequency: Frequency::Monthly,
    }
}

fn make_raw_shuffled(n: usize) -> Vec<RawObservation> {
    // Deterministic pseudo-shuffle with a few duplicates thrown in
    (0..n)
        .map(|i| {
            let offset = (i * 7919) % n;
            let date = base_date() + chrono::Duration::days(offset as i64);
            RawObservation::new(date.format("%Y-%m-%d").to_string(), Some(offset as f64))
        })
        .collect()
}

fn bench_clean(c: &mut Criterion) {
    let mut group = c.benchmark_group("clean_series");
    for &n in &[1_000usize, 10_000] {
        let raw = make_raw_shuffled(n);
        let start = base_date();
        let end = base_date() + chrono::Duration::days(n as i64 + 1);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| clean_series(black_box("bench"), black_box(&raw), start, end))
        });
    }
    group.finish();
}

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align_to_calendar");
    for &days in &[1_000usize, 5_000, 10_000] {
        let primary = make_daily("primary", days);
        let calendar = establish_calendar(&primary).unwrap();
        let monthly = make_monthly("cpi", days / 21);

        group.bench_with_input(BenchmarkId::new("daily_exact", days), &days, |b, _| {
            b.iter(|| align_to_calendar(black_box(&calendar), black_box(&primary)))
        });
        group.bench_with_input(BenchmarkId::new("monthly_fill", days), &days, |b, _| {
            b.iter(|| align_to_calendar(black_box(&calendar), black_box(&monthly)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_clean, bench_align);
criterion_main!(benches);
