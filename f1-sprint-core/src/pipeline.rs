//! High-level pipeline: load → validate → clean → aggregate → enrich → publish.
//!
//! # Responsibilities
//! - Fail fast: the first fatal error stops the run and nothing is written
//! - Validate all three tables (so every problem is logged) before the gate decides
//! - Compute everything in memory first; artifacts are written only afterwards
//!
//! # Navigation
//! - Pure computation: [`analyse`] / [`analyse_tables`]
//! - Artifacts: [`publish`]
//! - Both, plus the optional download: [`run`]

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::cleaning::{clean_drivers_data, clean_races_data, clean_sprint_results};
use crate::config::PipelineConfig;
use crate::contract::{Downloader, Reporter};
use crate::error::{PipelineError, Result};
use crate::features::{
    calculate_sprint_wins, enrich_sprint_wins_data, identify_sprint_winners, merge_sprint_data,
    wins_by_year,
};
use crate::model::{MergedWinRecord, SprintWinSummary, YearCount};
use crate::report::stage_sprint_wins;
use crate::table::{load_csv_data, RawTable};
use crate::validation::{
    validate_drivers, validate_races, validate_sprint_results, ValidationReport,
};

pub const SPRINT_RESULTS_FILE: &str = "sprint_results.csv";
pub const DRIVERS_FILE: &str = "drivers.csv";
pub const RACES_FILE: &str = "races.csv";

/// Everything the pipeline computes, before anything is written.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub summary: Vec<SprintWinSummary>,
    pub merged: Vec<MergedWinRecord>,
    pub wins_by_year: Vec<YearCount>,
    pub validation: Vec<ValidationReport>,
    /// Sprint result rows dropped for a non-numeric position.
    pub dropped_rows: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub output: PipelineOutput,
    pub csv_path: PathBuf,
    pub chart_paths: Vec<PathBuf>,
}

/// Returns the directory to read from, downloading into `data_dir` first if asked to.
pub async fn resolve_data_path<D>(config: &PipelineConfig, downloader: &D) -> Result<PathBuf>
where
    D: Downloader + ?Sized,
{
    if !config.download {
        info!(path = %config.data_dir.display(), "Using existing dataset");
        return Ok(config.data_dir.clone());
    }
    match downloader.download(&config.data_dir).await {
        Ok(path) => {
            info!(path = %path.display(), "Dataset downloaded");
            Ok(path)
        }
        Err(e) => {
            error!(error = %e, "[PIPELINE][ERROR] Dataset download failed");
            Err(PipelineError::Download(e))
        }
    }
}

/// Loads the three source files from `data_path` and runs [`analyse_tables`].
pub fn analyse(data_path: &Path) -> Result<PipelineOutput> {
    info!(path = %data_path.display(), "[PIPELINE] Loading F1 dataset files");
    let sprint_results = load_csv_data(data_path, SPRINT_RESULTS_FILE)?;
    let drivers = load_csv_data(data_path, DRIVERS_FILE)?;
    let races = load_csv_data(data_path, RACES_FILE)?;
    analyse_tables(&sprint_results, &drivers, &races)
}

pub fn analyse_tables(
    sprint_results: &RawTable,
    drivers: &RawTable,
    races: &RawTable,
) -> Result<PipelineOutput> {
    info!("[PIPELINE] Validating data");
    let validation = vec![
        validate_sprint_results(sprint_results),
        validate_drivers(drivers),
        validate_races(races),
    ];
    if let Some(failed) = validation.iter().find(|report| !report.is_valid()) {
        error!(table = %failed.table, "[PIPELINE][ERROR] Data validation failed");
        failed.clone().into_result()?;
    }

    info!("[PIPELINE] Cleaning data");
    let results_clean = clean_sprint_results(sprint_results)?;
    let drivers_clean = clean_drivers_data(drivers)?;
    let races_clean = clean_races_data(races)?;

    info!("[PIPELINE] Performing feature engineering");
    let winners = identify_sprint_winners(&results_clean.table);
    let merged = merge_sprint_data(&winners, &races_clean.table, &drivers_clean.table)?;
    let counts = calculate_sprint_wins(&merged);
    let summary = enrich_sprint_wins_data(&counts, &merged)?;
    let by_year = wins_by_year(&merged);

    match serde_json::to_string(&summary) {
        Ok(json) => debug!(json = %json, "[PIPELINE][DEBUG] Sprint win summary"),
        Err(e) => debug!(error = ?e, "[PIPELINE][DEBUG] Failed to serialize summary as JSON"),
    }

    Ok(PipelineOutput {
        summary,
        merged,
        wins_by_year: by_year,
        validation,
        dropped_rows: results_clean.dropped_rows,
    })
}

/// Stages `sprint_wins.csv`, hands both tables to the reporter for charts and
/// commits the csv only once the charts exist. On any failure no artifact is
/// left behind.
pub fn publish<R>(
    output: &PipelineOutput,
    output_dir: &Path,
    reporter: &R,
) -> Result<(PathBuf, Vec<PathBuf>)>
where
    R: Reporter + ?Sized,
{
    let staged = stage_sprint_wins(&output.summary, output_dir)?;

    info!("[PIPELINE] Creating visualizations");
    let chart_paths = reporter
        .render(&output.summary, &output.wins_by_year, output_dir)
        .map_err(|e| {
            error!(error = %e, "[PIPELINE][ERROR] Chart rendering failed");
            PipelineError::Report(e)
        })?;

    match staged.commit() {
        Ok(csv_path) => Ok((csv_path, chart_paths)),
        Err(e) => {
            error!(error = %e, "[PIPELINE][ERROR] Failed to save processed data, removing charts");
            for path in &chart_paths {
                if let Err(remove_err) = fs::remove_file(path) {
                    error!(error = %remove_err, path = %path.display(), "Failed to remove chart");
                }
            }
            Err(e)
        }
    }
}

/// Full run for a loaded configuration.
pub async fn run<D, R>(
    config: &PipelineConfig,
    downloader: &D,
    reporter: &R,
) -> Result<PipelineReport>
where
    D: Downloader + ?Sized,
    R: Reporter + ?Sized,
{
    config.trace_loaded();
    let data_path = resolve_data_path(config, downloader).await?;
    let output = analyse(&data_path)?;
    let (csv_path, chart_paths) = publish(&output, &config.output_dir, reporter)?;
    info!(
        drivers = output.summary.len(),
        charts = chart_paths.len(),
        "[PIPELINE] Analysis completed successfully"
    );
    Ok(PipelineReport {
        output,
        csv_path,
        chart_paths,
    })
}
