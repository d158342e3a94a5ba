//! Series Cleaner — raw rows in, canonical ordered series out.
//!
//! Pure transform. Per-row problems (unparseable date, out-of-range date,
//! missing value) are recovered locally and counted; cleaning never aborts
//! a run. Unparseable dates drop the row — they are never defaulted to the
//! run date or the epoch.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use super::frequency;
use crate::domain::{CleanedSeries, Observation, RawObservation};

/// Date formats accepted from the raw feeds, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// A date string none of the accepted formats could parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable date '{0}'")]
pub struct MalformedDate(pub String);

/// Parse a raw date string against the accepted formats.
pub fn parse_date(raw: &str) -> Result<NaiveDate, MalformedDate> {
    let trimmed = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }
    Err(MalformedDate(raw.to_string()))
}

/// Row accounting for one cleaned series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub series: String,
    pub rows_in: usize,
    pub rows_kept: usize,
    pub malformed_dates: usize,
    pub out_of_range: usize,
    pub duplicates: usize,
    /// Kept rows whose value is the explicit missing marker.
    pub missing_values: usize,
}

/// Clean one raw series into a canonical ordered series.
///
/// - dates parsed to calendar dates; unparseable rows dropped and counted
/// - rows outside `[start, end]` dropped
/// - non-finite values become the explicit missing marker, never zero
/// - dates sorted ascending; duplicate dates resolved deterministically —
///   the last observation in input order wins (upstream feeds re-send
///   corrected rows)
pub fn clean_series(
    id: &str,
    raw: &[RawObservation],
    start: NaiveDate,
    end: NaiveDate,
) -> (CleanedSeries, CleanReport) {
    let rows_in = raw.len();
    let mut malformed_dates = 0usize;
    let mut out_of_range = 0usize;

    let mut points: Vec<Observation> = Vec::with_capacity(raw.len());
    for row in raw {
        let date = match parse_date(&row.date) {
            Ok(date) => date,
            Err(e) => {
                warn!(series = id, error = %e, "dropping row with malformed date");
                malformed_dates += 1;
                continue;
            }
        };
        if date < start || date > end {
            out_of_range += 1;
            continue;
        }
        let value = row.value.filter(|v| v.is_finite());
        points.push(Observation::new(date, value));
    }

    // Stable sort keeps input order within a date so the dedup below can
    // apply last-wins deterministically.
    points.sort_by_key(|o| o.date);
    let before_dedup = points.len();
    points.dedup_by(|current, previous| {
        if current.date == previous.date {
            previous.value = current.value;
            true
        } else {
            false
        }
    });
    let duplicates = before_dedup - points.len();

    let missing_values = points.iter().filter(|o| o.value.is_none()).count();
    let frequency = frequency::classify(&points);

    if malformed_dates > 0 || out_of_range > 0 || duplicates > 0 {
        debug!(
            series = id,
            malformed_dates, out_of_range, duplicates, "dropped rows while cleaning"
        );
    }

    let report = CleanReport {
        series: id.to_string(),
        rows_in,
        rows_kept: points.len(),
        malformed_dates,
        out_of_range,
        duplicates,
        missing_values,
    };

    (
        CleanedSeries {
            id: id.to_string(),
            observations: points,
            frequency,
        },
        report,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window() -> (NaiveDate, NaiveDate) {
        (date(2020, 1, 1), date(2024, 12, 31))
    }

    #[test]
    fn parses_all_accepted_formats() {
        assert_eq!(parse_date("2024-01-02").unwrap(), date(2024, 1, 2));
        assert_eq!(parse_date("2024/01/02").unwrap(), date(2024, 1, 2));
        assert_eq!(parse_date("01/02/2024").unwrap(), date(2024, 1, 2));
        assert_eq!(parse_date("20240102").unwrap(), date(2024, 1, 2));
        assert_eq!(parse_date(" 2024-01-02 ").unwrap(), date(2024, 1, 2));
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn malformed_dates_are_dropped_not_defaulted() {
        let (start, end) = window();
        let raw = vec![
            RawObservation::new("2024-01-02", Some(1.0)),
            RawObservation::new("not a date", Some(2.0)),
        ];
        let (series, report) = clean_series("vix", &raw, start, end);

        assert_eq!(series.len(), 1);
        assert_eq!(report.malformed_dates, 1);
        assert_eq!(report.rows_kept, 1);
    }

    #[test]
    fn out_of_order_rows_are_sorted() {
        let (start, end) = window();
        let raw = vec![
            RawObservation::new("2024-01-03", Some(3.0)),
            RawObservation::new("2024-01-01", Some(1.0)),
            RawObservation::new("2024-01-02", Some(2.0)),
        ];
        let (series, _) = clean_series("sp500", &raw, start, end);

        let dates: Vec<NaiveDate> = series.observations.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            [date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
    }

    #[test]
    fn duplicate_dates_last_observation_wins() {
        let (start, end) = window();
        let raw = vec![
            RawObservation::new("2024-01-02", Some(100.0)),
            RawObservation::new("2024-01-02", Some(101.5)),
            RawObservation::new("2024-01-03", Some(102.0)),
        ];
        let (series, report) = clean_series("sp500", &raw, start, end);

        assert_eq!(series.len(), 2);
        assert_eq!(series.observations[0].value, Some(101.5));
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn rows_outside_window_are_dropped() {
        let raw = vec![
            RawObservation::new("2019-12-31", Some(1.0)),
            RawObservation::new("2024-01-02", Some(2.0)),
            RawObservation::new("2025-01-02", Some(3.0)),
        ];
        let (start, end) = window();
        let (series, report) = clean_series("sp500", &raw, start, end);

        assert_eq!(series.len(), 1);
        assert_eq!(report.out_of_range, 2);
    }

    #[test]
    fn nan_becomes_missing_not_zero() {
        let (start, end) = window();
        let raw = vec![
            RawObservation::new("2024-01-02", Some(f64::NAN)),
            RawObservation::new("2024-01-03", None),
            RawObservation::new("2024-01-04", Some(17.5)),
        ];
        let (series, report) = clean_series("vix", &raw, start, end);

        assert_eq!(series.observations[0].value, None);
        assert_eq!(series.observations[1].value, None);
        assert_eq!(series.observations[2].value, Some(17.5));
        assert_eq!(report.missing_values, 2);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let (start, end) = window();
        let raw = vec![
            RawObservation::new("2024-01-03", Some(3.0)),
            RawObservation::new("2024-01-01", Some(1.0)),
            RawObservation::new("2024-01-01", Some(1.5)),
            RawObservation::new("bogus", Some(9.0)),
        ];
        let (once, _) = clean_series("sp500", &raw, start, end);

        let reraw: Vec<RawObservation> = once
            .observations
            .iter()
            .map(|o| RawObservation::new(o.date.format("%Y-%m-%d").to_string(), o.value))
            .collect();
        let (twice, report) = clean_series("sp500", &reraw, start, end);

        assert_eq!(once, twice);
        assert_eq!(report.malformed_dates, 0);
        assert_eq!(report.duplicates, 0);
    }
}
