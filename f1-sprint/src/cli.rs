///
/// This module implements the CLI interface for f1-sprint: command parsing,
/// config resolution and the user-visible output of a run.
///
/// All pipeline logic (loading, validation, cleaning, aggregation) lives in the
/// [`f1-sprint-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: use the installed `f1-sprint` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`],
///   or [`run_analyze`] with your own downloader and reporter.
///
/// [`f1-sprint-core`]: ../../f1-sprint-core/
use crate::chart::PngChartReporter;
use crate::load_config::{load_config, resolve, Overrides, ResolvedConfig};
use crate::logging::DEFAULT_LOG_FILE;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use f1_sprint_core::contract::{Downloader, Reporter};
use f1_sprint_core::download::KaggleDownloader;
use f1_sprint_core::pipeline::{self, PipelineReport};
use f1_sprint_core::report::format_summary_table;
use std::path::PathBuf;

/// CLI for f1-sprint: count F1 sprint race wins per driver.
#[derive(Parser)]
#[clap(
    name = "f1-sprint",
    version,
    about = "Count Formula 1 sprint race wins per driver from the Kaggle F1 dataset"
)]
pub struct Cli {
    /// Also append logs to this file
    #[clap(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log to stderr only
    #[clap(long, global = true)]
    pub no_log_file: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_file(&self) -> Option<&std::path::Path> {
        (!self.no_log_file).then_some(self.log_file.as_path())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the sprint wins analysis and write the csv and charts
    Analyze {
        /// Path to a YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Directory containing the F1 dataset [default: data/raw]
        #[clap(long)]
        data_dir: Option<PathBuf>,
        /// Directory to save processed data and plots [default: data/processed]
        #[clap(long)]
        output_dir: Option<PathBuf>,
        /// Download the F1 dataset from Kaggle first
        #[clap(long)]
        download: bool,
    },
    /// Only download the F1 dataset from Kaggle
    Download {
        /// Path to a YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
        /// Directory to download into [default: data/raw]
        #[clap(long)]
        data_dir: Option<PathBuf>,
        /// Kaggle dataset slug
        #[clap(long)]
        dataset: Option<String>,
    },
}

fn resolve_command_config(config: Option<PathBuf>, overrides: Overrides) -> Result<ResolvedConfig> {
    let file = config.map(load_config).transpose()?;
    let resolved = resolve(file, overrides);
    resolved.pipeline.trace_loaded();
    Ok(resolved)
}

/// Runs the analysis with the given collaborators and prints the result table.
pub async fn run_analyze(
    config: &ResolvedConfig,
    downloader: &dyn Downloader,
    reporter: &dyn Reporter,
) -> Result<PipelineReport> {
    std::fs::create_dir_all(&config.pipeline.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.pipeline.output_dir.display()
        )
    })?;

    let report = pipeline::run(&config.pipeline, downloader, reporter)
        .await
        .context("Sprint wins analysis failed")?;

    println!("\nNumber of F1 Sprint race wins per driver:");
    print!("{}", format_summary_table(&report.output.summary));
    Ok(report)
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Analyze {
            config,
            data_dir,
            output_dir,
            download,
        } => {
            let config = resolve_command_config(
                config,
                Overrides {
                    data_dir,
                    output_dir,
                    download,
                    dataset: None,
                },
            )?;
            tracing::info!(command = "analyze", "Starting sprint wins analysis");
            let downloader = KaggleDownloader::new(config.dataset.clone());
            let reporter = PngChartReporter::default();
            match run_analyze(&config, &downloader, &reporter).await {
                Ok(report) => {
                    tracing::info!(
                        command = "analyze",
                        csv = %report.csv_path.display(),
                        charts = report.chart_paths.len(),
                        "Analysis complete"
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(
                        command = "analyze",
                        error = %format!("{e:#}"),
                        "Analysis failed"
                    );
                    Err(e)
                }
            }
        }
        Commands::Download {
            config,
            data_dir,
            dataset,
        } => {
            let config = resolve_command_config(
                config,
                Overrides {
                    data_dir,
                    output_dir: None,
                    download: true,
                    dataset,
                },
            )?;
            tracing::info!(command = "download", dataset = %config.dataset, "Starting download");
            let downloader = KaggleDownloader::new(config.dataset.clone());
            let path = downloader
                .download(&config.pipeline.data_dir)
                .await
                .map_err(|e| anyhow::Error::msg(format!("Download failed: {e}")))?;
            println!("Dataset downloaded to {}", path.display());
            Ok(())
        }
    }
}
