//! Dataset pipeline — clean, classify, align, assemble.
//!
//! `build_from_observations` is the synchronous batch core: it consumes
//! fully-materialized raw series and either returns a complete merged table
//! plus manifest or fails with one specific error kind. There is no
//! partial-success mode — a partially-wrong dataset is worse than a failed
//! run when the consumer is a predictive model.

pub mod align;
pub mod assemble;
pub mod clean;
pub mod frequency;

pub use align::AlignError;
pub use assemble::AssembleError;
pub use clean::{clean_series, parse_date, CleanReport, MalformedDate};

use thiserror::Error;
use tracing::info;

use crate::config::PipelineConfig;
use crate::data::SeriesInput;
use crate::domain::{CleanedSeries, DatasetManifest, MergedDataset};

/// Fatal pipeline failure. Per-row issues never show up here — they are
/// recovered in the cleaner and reported through `CleanReport`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),
}

/// Everything a successful run produces.
#[derive(Debug)]
pub struct BuildResult {
    pub dataset: MergedDataset,
    pub manifest: DatasetManifest,
    /// Cleaned per-series data, in column order (for the per-series artifacts).
    pub cleaned: Vec<CleanedSeries>,
    /// Row accounting per series, in column order.
    pub reports: Vec<CleanReport>,
}

/// Run the cleaning/alignment core over materialized raw series.
///
/// `series` must be in merge order with the primary series first — the
/// order `config.series_order()` and `data::fetch_series` produce.
pub fn build_from_observations(
    config: &PipelineConfig,
    series: &[SeriesInput],
) -> Result<BuildResult, PipelineError> {
    let start = config.start_date;
    let end = config.resolved_end_date();

    match series.first() {
        Some(first) if first.name == config.primary => {}
        _ => return Err(AlignError::NoPrimarySeries(config.primary.clone()).into()),
    }

    let mut cleaned = Vec::with_capacity(series.len());
    let mut reports = Vec::with_capacity(series.len());
    for input in series {
        let (cleaned_series, report) = clean::clean_series(&input.name, &input.observations, start, end);
        info!(
            series = %report.series,
            rows_in = report.rows_in,
            rows_kept = report.rows_kept,
            frequency = ?cleaned_series.frequency,
            "cleaned series"
        );
        cleaned.push(cleaned_series);
        reports.push(report);
    }

    let (primary, others) = cleaned.split_first().expect("series checked non-empty");
    let dataset = align::merge(primary, others)?;
    let (dataset, manifest) = assemble::assemble(dataset, start, end)?;

    Ok(BuildResult {
        dataset,
        manifest,
        cleaned,
        reports,
    })
}
