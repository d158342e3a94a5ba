//! Acquisition connector trait and structured error types.
//!
//! The `SeriesProvider` trait abstracts over raw-data sources (price feed,
//! macro-data feed) so the pipeline can swap implementations and mock them
//! in tests. Connectors hand the core fully-materialized observation
//! sequences; the core itself never blocks on network I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::RawObservation;

/// Structured error types for acquisition.
///
/// The pipeline treats every variant the same way — "series unavailable".
/// Retry and backoff policy lives inside the connectors, never in the core.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("series not found: {series}")]
    SeriesNotFound { series: String },

    #[error("provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("no provider configured for this series")]
    NoProvider,

    #[error("data error: {0}")]
    Other(String),
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    YahooFinance,
    Fred,
    Synthetic,
}

/// Result of a successful fetch for a single series.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// External source identifier the observations were fetched under.
    pub series_id: String,
    pub observations: Vec<RawObservation>,
    pub source: SourceKind,
}

/// Trait for acquisition connectors (price feed, macro-data feed).
///
/// Implementations handle the specifics of one source. The pipeline sits
/// above this trait — providers know nothing about cleaning or alignment.
pub trait SeriesProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch raw observations for a series over a date range.
    fn fetch(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;

    /// Whether the provider is currently usable (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}

/// Progress callback for multi-series fetches.
pub trait FetchProgress: Send {
    /// Called when starting to fetch a series.
    fn on_start(&self, name: &str, index: usize, total: usize);

    /// Called when a series fetch completes.
    fn on_complete(&self, name: &str, index: usize, total: usize, result: &Result<(), DataError>);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, name: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {name}...", index + 1, total);
    }

    fn on_complete(
        &self,
        name: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {name}"),
            Err(e) => println!("  FAIL: {name}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nFetch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}
