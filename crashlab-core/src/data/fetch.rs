//! Fetch orchestrator — acquires every configured series with progress
//! reporting.
//!
//! Connector failures are not fatal here: an unavailable series is handed
//! to the pipeline with zero observations and recorded in the outcome. The
//! assembler decides whether that kills the run (a configured column that
//! stays entirely empty does). Once a provider's circuit breaker trips,
//! the remaining series on that provider fail fast without new requests.

use std::collections::BTreeMap;

use tracing::{info, warn};

use super::provider::{DataError, FetchProgress, SeriesProvider, SourceKind};
use super::synthetic;
use crate::config::{PipelineConfig, SeriesKind};
use crate::domain::RawObservation;

/// One configured series, materialized for the pipeline core.
#[derive(Debug, Clone)]
pub struct SeriesInput {
    /// Friendly column name.
    pub name: String,
    pub observations: Vec<RawObservation>,
}

/// Outcome of a batch fetch: every configured series in merge order.
#[derive(Debug)]
pub struct FetchOutcome {
    pub series: Vec<SeriesInput>,
    /// Source per series that produced data.
    pub sources: BTreeMap<String, SourceKind>,
    /// Series that produced no data, with the connector error.
    pub unavailable: Vec<(String, DataError)>,
    /// Whether any series was substituted with synthetic data.
    pub has_synthetic: bool,
}

/// Fetch all configured series in merge order.
///
/// `prices` serves ticker series, `macros` serves macro series; passing
/// `None` for either marks its series unavailable (offline mode). With
/// `use_synthetic`, unavailable series are replaced by deterministic
/// synthetic data and tagged.
pub fn fetch_series(
    config: &PipelineConfig,
    prices: Option<&dyn SeriesProvider>,
    macros: Option<&dyn SeriesProvider>,
    progress: Option<&dyn FetchProgress>,
    use_synthetic: bool,
) -> FetchOutcome {
    let specs = config.series_order();
    let total = specs.len();
    let start = config.start_date;
    let end = config.resolved_end_date();

    let mut series = Vec::with_capacity(total);
    let mut sources = BTreeMap::new();
    let mut unavailable = Vec::new();
    let mut has_synthetic = false;

    for (i, spec) in specs.iter().enumerate() {
        if let Some(p) = progress {
            p.on_start(&spec.name, i, total);
        }

        let provider = match spec.kind {
            SeriesKind::Price => prices,
            SeriesKind::Macro => macros,
        };

        let fetched = match provider {
            Some(p) if p.is_available() => p
                .fetch(&spec.source_id, start, end)
                .map(|r| (r.observations, r.source)),
            Some(_) => Err(DataError::CircuitBreakerTripped),
            None => Err(DataError::NoProvider),
        };

        match fetched {
            Ok((observations, source)) => {
                info!(
                    series = %spec.name,
                    source_id = %spec.source_id,
                    rows = observations.len(),
                    "fetched series"
                );
                if let Some(p) = progress {
                    p.on_complete(&spec.name, i, total, &Ok(()));
                }
                sources.insert(spec.name.clone(), source);
                series.push(SeriesInput {
                    name: spec.name.clone(),
                    observations,
                });
            }
            Err(e) if use_synthetic => {
                warn!(series = %spec.name, error = %e, "series unavailable — substituting synthetic data");
                let observations = match spec.kind {
                    SeriesKind::Price => synthetic::synthetic_daily(&spec.source_id, start, end),
                    SeriesKind::Macro => synthetic::synthetic_monthly(&spec.source_id, start, end),
                };
                if let Some(p) = progress {
                    p.on_complete(&spec.name, i, total, &Ok(()));
                }
                sources.insert(spec.name.clone(), SourceKind::Synthetic);
                has_synthetic = true;
                series.push(SeriesInput {
                    name: spec.name.clone(),
                    observations,
                });
            }
            Err(e) => {
                warn!(series = %spec.name, error = %e, "series unavailable");
                let result = Err(e);
                if let Some(p) = progress {
                    p.on_complete(&spec.name, i, total, &result);
                }
                if let Err(e) = result {
                    unavailable.push((spec.name.clone(), e));
                }
                series.push(SeriesInput {
                    name: spec.name.clone(),
                    observations: Vec::new(),
                });
            }
        }
    }

    if let Some(p) = progress {
        let succeeded = sources.len();
        p.on_batch_complete(succeeded, total - succeeded, total);
    }

    FetchOutcome {
        series,
        sources,
        unavailable,
        has_synthetic,
    }
}
