//! Acquisition connectors and fetch orchestration.
//!
//! Everything here is the external edge of the system. The pipeline core
//! consumes fully-materialized observation sequences and treats any
//! connector failure as "series unavailable" — rate-limit handling, retry,
//! and secrets stay on this side of the boundary.

pub mod circuit_breaker;
pub mod fetch;
pub mod fred;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use fetch::{fetch_series, FetchOutcome, SeriesInput};
pub use fred::FredProvider;
pub use provider::{
    DataError, FetchProgress, FetchResult, SeriesProvider, SourceKind, StdoutProgress,
};
pub use yahoo::YahooProvider;
