//! Aligner/Merger — one column per series on the primary trading calendar.
//!
//! Daily series align by exact date: a calendar day with no observation is
//! data loss and stays missing. Low-frequency series forward-fill: a macro
//! reading describes the whole period until the next report, so every
//! trading day carries the most recent observation at or before it. Both
//! paths are a single monotonic pass over the calendar with one cursor into
//! the series — an observation dated after the day being filled can never
//! be reached, which rules out look-ahead leakage by construction.

use thiserror::Error;
use tracing::debug;

use crate::domain::{AlignedColumn, CleanedSeries, MergedDataset, TradingCalendar};

#[derive(Debug, Error)]
pub enum AlignError {
    /// The primary daily series is absent or empty — no calendar can exist.
    #[error("primary series '{0}' is absent or empty: cannot establish trading calendar")]
    NoPrimarySeries(String),
}

/// Derive the trading calendar from the primary daily price series.
///
/// The calendar is derived once per run and immutable thereafter; it is
/// the single source of truth for which dates appear in the final dataset.
pub fn establish_calendar(primary: &CleanedSeries) -> Result<TradingCalendar, AlignError> {
    if primary.is_empty() {
        return Err(AlignError::NoPrimarySeries(primary.id.clone()));
    }
    Ok(TradingCalendar::from_dates(
        primary.observations.iter().map(|o| o.date).collect(),
    ))
}

/// Align one cleaned series to the calendar.
///
/// Cost is O(series length + calendar length): the cursor only moves
/// forward. Leading calendar days before the series' first observation stay
/// missing — never back-filled.
pub fn align_to_calendar(calendar: &TradingCalendar, series: &CleanedSeries) -> AlignedColumn {
    let observations = &series.observations;
    let fills_forward = series.frequency.fills_forward();

    let mut values = Vec::with_capacity(calendar.len());
    let mut missing_before_fill = 0usize;
    let mut cursor = 0usize;
    let mut carried: Option<f64> = None;

    for &date in calendar.dates() {
        let mut exact: Option<f64> = None;
        while cursor < observations.len() && observations[cursor].date <= date {
            let obs = observations[cursor];
            if obs.value.is_some() {
                // A value-less observation carries no information, so it
                // does not overwrite the last known value.
                carried = obs.value;
            }
            if obs.date == date {
                exact = obs.value;
            }
            cursor += 1;
        }

        if exact.is_none() {
            missing_before_fill += 1;
        }

        values.push(if fills_forward { carried } else { exact });
    }

    debug!(
        series = %series.id,
        frequency = ?series.frequency,
        missing_before_fill,
        "aligned series to calendar"
    );

    AlignedColumn {
        id: series.id.clone(),
        frequency: series.frequency,
        values,
        missing_before_fill,
    }
}

/// Merge the primary series and the remaining series into the wide table.
///
/// Column order is deterministic: primary first, then `others` in the order
/// supplied.
pub fn merge(
    primary: &CleanedSeries,
    others: &[CleanedSeries],
) -> Result<MergedDataset, AlignError> {
    let calendar = establish_calendar(primary)?;

    let mut columns = Vec::with_capacity(1 + others.len());
    columns.push(align_to_calendar(&calendar, primary));
    for series in others {
        columns.push(align_to_calendar(&calendar, series));
    }

    Ok(MergedDataset { calendar, columns })
}
