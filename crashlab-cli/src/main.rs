//! CrashLab CLI — fetch raw series and build the merged dataset.
//!
//! Commands:
//! - `fetch` — acquire all configured series and write `<series>_raw.csv`
//! - `build` — full pipeline run: fetch, clean, align, assemble, and write
//!   raw/clean/merged artifacts plus the run manifest

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crashlab_core::artifacts::CsvStore;
use crashlab_core::data::{
    fetch_series, CircuitBreaker, FetchOutcome, FredProvider, SeriesProvider, StdoutProgress,
    YahooProvider,
};
use crashlab_core::pipeline::BuildResult;
use crashlab_core::{build_from_observations, PipelineConfig};

#[derive(Parser)]
#[command(
    name = "crashlab",
    about = "CrashLab CLI — crash-prediction dataset assembly"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire all configured series and write `<series>_raw.csv` files.
    Fetch {
        /// Path to the pipeline config TOML.
        #[arg(long)]
        config: PathBuf,

        /// Output directory for artifacts.
        #[arg(long, default_value = "dataset")]
        out_dir: PathBuf,

        /// Substitute deterministic synthetic data for unavailable series.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Run the full pipeline and write raw/clean/merged artifacts.
    Build {
        /// Path to the pipeline config TOML.
        #[arg(long)]
        config: PathBuf,

        /// Output directory for artifacts.
        #[arg(long, default_value = "dataset")]
        out_dir: PathBuf,

        /// Offline mode: no network access.
        #[arg(long, default_value_t = false)]
        offline: bool,

        /// Substitute deterministic synthetic data for unavailable series.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            config,
            out_dir,
            synthetic,
        } => run_fetch(&config, &out_dir, synthetic),
        Commands::Build {
            config,
            out_dir,
            offline,
            synthetic,
        } => run_build(&config, &out_dir, offline, synthetic),
    }
}

struct Providers {
    prices: Option<YahooProvider>,
    macros: Option<FredProvider>,
}

fn make_providers(offline: bool) -> Providers {
    if offline {
        return Providers {
            prices: None,
            macros: None,
        };
    }

    let prices = Some(YahooProvider::new(Arc::new(
        CircuitBreaker::default_provider(),
    )));
    let macros = match FredProvider::from_env(Arc::new(CircuitBreaker::default_provider())) {
        Ok(provider) => Some(provider),
        Err(e) => {
            eprintln!("WARNING: macro feed disabled: {e}");
            None
        }
    };

    Providers { prices, macros }
}

fn fetch_all(config: &PipelineConfig, offline: bool, synthetic: bool) -> FetchOutcome {
    let providers = make_providers(offline);
    let progress = StdoutProgress;
    fetch_series(
        config,
        providers.prices.as_ref().map(|p| p as &dyn SeriesProvider),
        providers.macros.as_ref().map(|p| p as &dyn SeriesProvider),
        Some(&progress),
        synthetic,
    )
}

fn run_fetch(config_path: &Path, out_dir: &Path, synthetic: bool) -> Result<()> {
    let config = PipelineConfig::from_file(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    let outcome = fetch_all(&config, false, synthetic);

    let store = CsvStore::new(out_dir);
    for input in &outcome.series {
        if !input.observations.is_empty() {
            let path = store.write_raw_series(&input.name, &input.observations)?;
            println!("Wrote {}", path.display());
        }
    }

    if !outcome.unavailable.is_empty() {
        for (name, err) in &outcome.unavailable {
            eprintln!("Error for {name}: {err}");
        }
        std::process::exit(1);
    }

    Ok(())
}

fn run_build(config_path: &Path, out_dir: &Path, offline: bool, synthetic: bool) -> Result<()> {
    let config = PipelineConfig::from_file(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    let outcome = fetch_all(&config, offline, synthetic);

    let result = build_from_observations(&config, &outcome.series)
        .context("pipeline aborted — nothing was written")?;

    let store = CsvStore::new(out_dir);
    for input in &outcome.series {
        store.write_raw_series(&input.name, &input.observations)?;
    }
    for series in &result.cleaned {
        store.write_clean_series(series)?;
    }
    let merged_path = store.write_merged(&result.dataset)?;
    store.write_manifest(&result.manifest)?;

    print_summary(&result, &outcome);
    println!("Merged dataset: {}", merged_path.display());

    Ok(())
}

fn print_summary(result: &BuildResult, outcome: &FetchOutcome) {
    let manifest = &result.manifest;

    println!();
    println!("=== Merged Dataset ===");
    println!(
        "Period:     {} to {}",
        manifest.start_date, manifest.end_date
    );
    println!("Rows:       {}", manifest.row_count);
    println!("Columns:    {}", manifest.column_count);
    println!("Hash:       {}", manifest.dataset_hash);
    println!();
    println!(
        "{:<12} {:<14} {:>9} {:>10} {:>10}",
        "Column", "Frequency", "Observed", "Pre-fill", "Post-fill"
    );
    println!("{}", "-".repeat(59));
    for column in &manifest.columns {
        println!(
            "{:<12} {:<14} {:>9} {:>10} {:>10}",
            column.id,
            format!("{:?}", column.frequency),
            column.observed,
            column.missing_before_fill,
            column.missing_after_fill,
        );
    }

    let dropped: usize = result
        .reports
        .iter()
        .map(|r| r.malformed_dates + r.out_of_range + r.duplicates)
        .sum();
    if dropped > 0 {
        println!();
        println!("Rows dropped during cleaning: {dropped} (see logs for detail)");
    }

    if outcome.has_synthetic {
        println!();
        println!("WARNING: dataset includes SYNTHETIC series");
    }
    println!();
}
