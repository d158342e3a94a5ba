//! Dataset Assembler — final validation and the run manifest.
//!
//! Anything that would silently produce a misleading dataset (an entirely
//! empty column, an empty or out-of-window calendar) aborts the run here.
//! A partially-wrong dataset is worse than a failed run when the consumer
//! is a predictive model.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};

use crate::domain::{ColumnStats, DatasetManifest, MergedDataset, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum AssembleError {
    /// A configured series never produced a usable cell — an upstream
    /// acquisition failure, not a data-quality nuance.
    #[error("column '{series}' is entirely empty after alignment")]
    EmptyColumn { series: String },

    #[error("trading calendar is empty or outside the configured window {start} to {end}")]
    DateRange { start: NaiveDate, end: NaiveDate },
}

/// Validate the merged table and produce the final artifact plus manifest.
pub fn assemble(
    dataset: MergedDataset,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(MergedDataset, DatasetManifest), AssembleError> {
    let (first, last) = match (dataset.calendar.first(), dataset.calendar.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            error!(%start, %end, "empty trading calendar");
            return Err(AssembleError::DateRange { start, end });
        }
    };
    if first < start || last > end {
        error!(%first, %last, %start, %end, "calendar outside configured window");
        return Err(AssembleError::DateRange { start, end });
    }

    for column in &dataset.columns {
        if column.is_all_missing() {
            error!(series = %column.id, "column entirely empty after alignment");
            return Err(AssembleError::EmptyColumn {
                series: column.id.clone(),
            });
        }
    }

    let row_count = dataset.row_count();
    let columns: Vec<ColumnStats> = dataset
        .columns
        .iter()
        .map(|c| ColumnStats {
            id: c.id.clone(),
            frequency: c.frequency,
            observed: row_count - c.missing_before_fill,
            missing_before_fill: c.missing_before_fill,
            missing_after_fill: c.missing_after_fill(),
        })
        .collect();

    let manifest = DatasetManifest {
        schema_version: SCHEMA_VERSION,
        start_date: first,
        end_date: last,
        row_count,
        column_count: dataset.column_count(),
        dataset_hash: dataset_hash(&dataset),
        columns,
    };

    info!(
        rows = manifest.row_count,
        columns = manifest.column_count,
        hash = %manifest.dataset_hash,
        "dataset assembled"
    );

    Ok((dataset, manifest))
}

/// Deterministic BLAKE3 hash over every date and cell in column order.
///
/// Missing cells hash differently from any real value so two datasets that
/// differ only in missingness get different hashes.
fn dataset_hash(dataset: &MergedDataset) -> String {
    let mut hasher = blake3::Hasher::new();

    for date in dataset.calendar.dates() {
        hasher.update(date.to_string().as_bytes());
    }
    for column in &dataset.columns {
        hasher.update(column.id.as_bytes());
        for value in &column.values {
            match value {
                Some(v) => {
                    hasher.update(&[1]);
                    hasher.update(&v.to_le_bytes());
                }
                None => {
                    hasher.update(&[0]);
                }
            }
        }
    }

    hasher.finalize().to_hex().to_string()
}
