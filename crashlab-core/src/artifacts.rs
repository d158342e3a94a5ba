//! CSV artifact store.
//!
//! File-format contract: row-oriented delimited text with a header row,
//! one value column per series. Per-series files are named
//! `<series>_<stage>.csv` (stage ∈ {raw, clean}); the merged table is a
//! single `merged.csv` with its `manifest.json` beside it.
//!
//! Writes are atomic: content goes to a `.tmp` sibling first, then renamed
//! into place, so a crashed run never leaves a truncated artifact behind.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::{CleanedSeries, DatasetManifest, MergedDataset, RawObservation, SCHEMA_VERSION};

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("manifest serialization error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("unsupported manifest schema version {found} (max supported: {supported})")]
    SchemaVersion { found: u32, supported: u32 },
}

/// Artifact stage for per-series files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Raw,
    Clean,
}

impl Stage {
    fn suffix(self) -> &'static str {
        match self {
            Stage::Raw => "raw",
            Stage::Clean => "clean",
        }
    }
}

/// Writes pipeline artifacts into one output directory.
pub struct CsvStore {
    out_dir: PathBuf,
}

impl CsvStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path of a per-series file: `<series>_<stage>.csv`.
    pub fn series_path(&self, name: &str, stage: Stage) -> PathBuf {
        self.out_dir.join(format!("{name}_{}.csv", stage.suffix()))
    }

    pub fn merged_path(&self) -> PathBuf {
        self.out_dir.join("merged.csv")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir.join("manifest.json")
    }

    /// Write one raw series as fetched, dates untouched.
    pub fn write_raw_series(
        &self,
        name: &str,
        observations: &[RawObservation],
    ) -> Result<PathBuf, ArtifactError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(["date", "value"])?;
        for obs in observations {
            let value = format_value(obs.value);
            wtr.write_record([obs.date.as_str(), value.as_str()])?;
        }

        let path = self.series_path(name, Stage::Raw);
        self.write_atomic(&path, &writer_bytes(wtr)?)?;
        Ok(path)
    }

    /// Write one cleaned series, dates in canonical `%Y-%m-%d` form.
    pub fn write_clean_series(&self, series: &CleanedSeries) -> Result<PathBuf, ArtifactError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(["date", "value"])?;
        for obs in &series.observations {
            let date = obs.date.to_string();
            let value = format_value(obs.value);
            wtr.write_record([date.as_str(), value.as_str()])?;
        }

        let path = self.series_path(&series.id, Stage::Clean);
        self.write_atomic(&path, &writer_bytes(wtr)?)?;
        Ok(path)
    }

    /// Write the merged table: a `date` column plus one column per series,
    /// empty cells for missing values.
    pub fn write_merged(&self, dataset: &MergedDataset) -> Result<PathBuf, ArtifactError> {
        let mut wtr = csv::Writer::from_writer(vec![]);

        let mut header = Vec::with_capacity(1 + dataset.column_count());
        header.push("date".to_string());
        header.extend(dataset.columns.iter().map(|c| c.id.clone()));
        wtr.write_record(&header)?;

        for (row, date) in dataset.calendar.dates().iter().enumerate() {
            let mut record = Vec::with_capacity(header.len());
            record.push(date.to_string());
            for column in &dataset.columns {
                record.push(format_value(column.values[row]));
            }
            wtr.write_record(&record)?;
        }

        let path = self.merged_path();
        self.write_atomic(&path, &writer_bytes(wtr)?)?;
        Ok(path)
    }

    /// Write the run manifest as pretty JSON.
    pub fn write_manifest(&self, manifest: &DatasetManifest) -> Result<PathBuf, ArtifactError> {
        let json = serde_json::to_string_pretty(manifest)?;
        let path = self.manifest_path();
        self.write_atomic(&path, json.as_bytes())?;
        Ok(path)
    }

    /// Load a previously written manifest, rejecting unknown schema versions.
    pub fn load_manifest(&self) -> Result<DatasetManifest, ArtifactError> {
        let json = fs::read_to_string(self.manifest_path())?;
        let manifest: DatasetManifest = serde_json::from_str(&json)?;
        if manifest.schema_version > SCHEMA_VERSION {
            return Err(ArtifactError::SchemaVersion {
                found: manifest.schema_version,
                supported: SCHEMA_VERSION,
            });
        }
        Ok(manifest)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.out_dir)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("out");
        let tmp = path.with_extension(format!("{ext}.tmp"));

        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            ArtifactError::Io(e)
        })
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn writer_bytes(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ArtifactError> {
    wtr.into_inner()
        .map_err(|e| ArtifactError::Io(std::io::Error::other(e.to_string())))
}
