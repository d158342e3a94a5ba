//! CrashLab Core — multi-source time-series cleaning and alignment engine.
//!
//! Assembles one daily-frequency dataset from heterogeneous financial and
//! economic series (index prices, macro indicators) for a downstream
//! crash-prediction model:
//! - Acquisition connectors (price feed, macro feed) behind one trait
//! - Per-series cleaning into canonical ordered series
//! - Native-frequency classification (daily vs monthly vs slower)
//! - Calendar alignment and forward-fill merging without look-ahead
//! - Final validation, run manifest, and CSV artifacts
//!
//! The core is a single-threaded, synchronous batch computation: each
//! component consumes immutable inputs and returns a new value, and the
//! network stops at the connector boundary.

pub mod artifacts;
pub mod config;
pub mod data;
pub mod domain;
pub mod pipeline;

pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{build_from_observations, BuildResult, PipelineError};
