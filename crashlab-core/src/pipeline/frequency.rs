//! Frequency Classifier — native cadence from the median date gap.

use crate::domain::{Frequency, Observation};

/// Classify a series' native cadence from the median gap between
/// consecutive dates.
///
/// Daily trading series gap by 1 calendar day most of the time (3 across a
/// weekend), so their median lands on 1; monthly indicators land on 28–31.
/// Series with fewer than 2 observations cannot be classified and are
/// treated as low-frequency, which forward-fills from the first occurrence.
pub fn classify(observations: &[Observation]) -> Frequency {
    if observations.len() < 2 {
        return Frequency::LowFrequency;
    }

    let mut gaps: Vec<i64> = observations
        .windows(2)
        .map(|w| (w[1].date - w[0].date).num_days())
        .collect();
    gaps.sort_unstable();
    let median = gaps[gaps.len() / 2];

    match median {
        1..=3 => Frequency::Daily,
        28..=31 => Frequency::Monthly,
        _ => Frequency::LowFrequency,
    }
}
