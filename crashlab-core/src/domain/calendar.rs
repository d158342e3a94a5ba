//! Trading calendar — the canonical daily date axis.
//!
//! Derived once per run from the primary daily price series and immutable
//! thereafter. Every row of the merged dataset corresponds to exactly one
//! calendar date; no other component may add or remove dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordered set of trading days, strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingCalendar {
    dates: Vec<NaiveDate>,
}

impl TradingCalendar {
    /// Build a calendar from dates that are already strictly increasing.
    ///
    /// The cleaner guarantees this for any `CleanedSeries`, which is the
    /// only place calendars are derived from.
    pub(crate) fn from_dates(dates: Vec<NaiveDate>) -> Self {
        debug_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        Self { dates }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
