use serde::{Deserialize, Serialize};

/// One raw row as produced by an acquisition connector, before cleaning.
///
/// The date is kept as the source emitted it — format unknown until the
/// cleaner parses it. The series it belongs to is carried by the enclosing
/// fetch result, not repeated per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub date: String,
    /// Observed value, if the source reported one.
    pub value: Option<f64>,
}

impl RawObservation {
    pub fn new(date: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}
