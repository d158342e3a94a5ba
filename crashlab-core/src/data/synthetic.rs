//! Deterministic synthetic series for offline development.
//!
//! Seeded from the series identifier so repeated runs produce identical
//! data. Anything built on synthetic series is tagged as such and must not
//! be mistaken for real market data.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::RawObservation;

fn seeded_rng(series_id: &str) -> StdRng {
    let seed_bytes = blake3::hash(series_id.as_bytes());
    StdRng::from_seed(*seed_bytes.as_bytes())
}

/// Generate a synthetic daily price series: a random walk from 100.0,
/// weekends skipped to mimic a trading calendar.
pub fn synthetic_daily(series_id: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawObservation> {
    let mut rng = seeded_rng(series_id);
    let mut observations = Vec::new();
    let mut level = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        level *= 1.0 + daily_return;
        observations.push(RawObservation::new(
            current.format("%Y-%m-%d").to_string(),
            Some(level),
        ));
        current += chrono::Duration::days(1);
    }

    observations
}

/// Generate a synthetic monthly macro series: one observation on the first
/// of each month, drifting slowly around 50.0.
pub fn synthetic_monthly(series_id: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawObservation> {
    let mut rng = seeded_rng(series_id);
    let mut observations = Vec::new();
    let mut level = 50.0_f64;

    let mut current = NaiveDate::from_ymd_opt(start.year(), start.month(), 1).unwrap();
    if current < start {
        current = next_month(current);
    }

    while current <= end {
        level += rng.gen_range(-1.0..1.0);
        observations.push(RawObservation::new(
            current.format("%Y-%m-%d").to_string(),
            Some(level),
        ));
        current = next_month(current);
    }

    observations
}

fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}
