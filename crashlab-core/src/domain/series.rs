use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A cleaned observation: canonical calendar date plus an explicit missing
/// marker.
///
/// `None` means the source had no usable value for that date. It is never
/// collapsed to zero — a missing VIX reading is not a VIX of 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// Native reporting cadence of a series as published by its source.
///
/// Only affects merge strategy: daily series align by exact date, everything
/// else forward-fills across the gap until the next observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Monthly,
    /// Anything slower or more irregular than monthly (quarterly, annual,
    /// or a series too short to classify).
    LowFrequency,
}

impl Frequency {
    /// Whether alignment may carry the last known value across calendar gaps.
    pub fn fills_forward(self) -> bool {
        !matches!(self, Frequency::Daily)
    }
}

/// One series after cleaning.
///
/// Invariant: dates strictly increasing and unique. Produced only by the
/// cleaner (`pipeline::clean`); the merger consumes it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedSeries {
    pub id: String,
    pub observations: Vec<Observation>,
    pub frequency: Frequency,
}

impl CleanedSeries {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    /// Count of observations that carry a value.
    pub fn observed(&self) -> usize {
        self.observations
            .iter()
            .filter(|o| o.value.is_some())
            .count()
    }
}
