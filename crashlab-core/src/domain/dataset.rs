//! Merged dataset and its manifest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::calendar::TradingCalendar;
use super::series::Frequency;

/// Current manifest schema version. Bump when the persisted shape changes.
pub const SCHEMA_VERSION: u32 = 1;

/// One series aligned to the trading calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedColumn {
    pub id: String,
    pub frequency: Frequency,
    /// One cell per calendar date; `None` is an explicit missing cell.
    pub values: Vec<Option<f64>>,
    /// Calendar dates with no same-date observed value of their own,
    /// counted before any forward-fill was applied.
    pub missing_before_fill: usize,
}

impl AlignedColumn {
    pub fn missing_after_fill(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(|v| v.is_none())
    }
}

/// The terminal wide table: one row per trading day, one column per series.
///
/// Invariants: `columns[i].values.len() == calendar.len()` for every column;
/// the primary series is always column 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedDataset {
    pub calendar: TradingCalendar,
    pub columns: Vec<AlignedColumn>,
}

impl MergedDataset {
    pub fn row_count(&self) -> usize {
        self.calendar.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, id: &str) -> Option<&AlignedColumn> {
        self.columns.iter().find(|c| c.id == id)
    }
}

/// Per-column cell accounting, reported in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub id: String,
    pub frequency: Frequency,
    /// Calendar cells backed by a same-date observation with a value.
    pub observed: usize,
    pub missing_before_fill: usize,
    pub missing_after_fill: usize,
}

/// Run manifest persisted alongside the merged table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub schema_version: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub row_count: usize,
    pub column_count: usize,
    /// BLAKE3 over every date and cell, in column order.
    pub dataset_hash: String,
    pub columns: Vec<ColumnStats>,
}
