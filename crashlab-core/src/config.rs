//! Pipeline configuration.
//!
//! A run is parameterized by one immutable `PipelineConfig` value threaded
//! into each component call: friendly series names mapped to external source
//! identifiers, plus the acquisition date window. There is no ambient
//! configuration state anywhere in the crate.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which connector family a configured series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Daily price series fetched from the price feed.
    Price,
    /// Macro indicator fetched from the macro-data feed.
    Macro,
}

/// One configured series, in deterministic merge order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    /// Friendly column name (e.g. `sp500`).
    pub name: String,
    /// External source identifier (ticker or macro-series code).
    pub source_id: String,
    pub kind: SeriesKind,
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Earliest date to include.
    pub start_date: NaiveDate,
    /// Latest date to include. Defaults to the run date when omitted.
    pub end_date: Option<NaiveDate>,
    /// Friendly name of the primary daily price series whose dates define
    /// the trading calendar. Must be a key of `tickers`.
    pub primary: String,
    /// Friendly name → ticker for the price feed.
    pub tickers: BTreeMap<String, String>,
    /// Friendly name → macro-series code for the macro feed.
    #[serde(default)]
    pub macro_series: BTreeMap<String, String>,
    /// Optional additional macro series, merged after `macro_series`.
    #[serde(default)]
    pub extra_macro_series: BTreeMap<String, String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no tickers configured — at least the primary price series is required")]
    NoTickers,

    #[error("primary series '{0}' is not a configured ticker")]
    UnknownPrimary(String),

    #[error("series name '{0}' appears in more than one table")]
    DuplicateSeries(String),

    #[error("start_date {start} is after end_date {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::NoTickers);
        }
        if !self.tickers.contains_key(&self.primary) {
            return Err(ConfigError::UnknownPrimary(self.primary.clone()));
        }
        for name in self.macro_series.keys() {
            if self.tickers.contains_key(name) || self.extra_macro_series.contains_key(name) {
                return Err(ConfigError::DuplicateSeries(name.clone()));
            }
        }
        for name in self.extra_macro_series.keys() {
            if self.tickers.contains_key(name) {
                return Err(ConfigError::DuplicateSeries(name.clone()));
            }
        }
        if let Some(end) = self.end_date {
            if self.start_date > end {
                return Err(ConfigError::InvertedDateRange {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }

    /// End of the acquisition window; the run date when left open.
    pub fn resolved_end_date(&self) -> NaiveDate {
        self.end_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// All configured series in deterministic merge order: primary first,
    /// then the remaining tickers, then macro series, then extra macro
    /// series (alphabetical within each table — TOML tables carry no order
    /// of their own).
    pub fn series_order(&self) -> Vec<SeriesSpec> {
        let mut order = Vec::with_capacity(
            self.tickers.len() + self.macro_series.len() + self.extra_macro_series.len(),
        );
        order.push(SeriesSpec {
            name: self.primary.clone(),
            source_id: self.tickers[&self.primary].clone(),
            kind: SeriesKind::Price,
        });
        for (name, ticker) in &self.tickers {
            if name != &self.primary {
                order.push(SeriesSpec {
                    name: name.clone(),
                    source_id: ticker.clone(),
                    kind: SeriesKind::Price,
                });
            }
        }
        for (name, code) in self.macro_series.iter().chain(&self.extra_macro_series) {
            order.push(SeriesSpec {
                name: name.clone(),
                source_id: code.clone(),
                kind: SeriesKind::Macro,
            });
        }
        order
    }
}
