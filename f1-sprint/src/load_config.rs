/// `load_config` module: reads the optional YAML config file and merges it with command line flags.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file into [`FileConfig`]
/// - Apply precedence: command line flag, then config file, then built-in default
/// - Produce the core [`PipelineConfig`] plus the dataset slug for the downloader
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
///
/// Accepted keys: `data_dir`, `output_dir`, `download`, `dataset`.
use anyhow::Result;
use f1_sprint_core::config::PipelineConfig;
use f1_sprint_core::download::DEFAULT_DATASET;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub download: Option<bool>,
    pub dataset: Option<String>,
}

/// Values given on the command line; `None` / `false` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub download: bool,
    pub dataset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub pipeline: PipelineConfig,
    pub dataset: String,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(FileConfig::default());
    }

    match serde_yaml::from_str::<FileConfig>(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

pub fn resolve(file: Option<FileConfig>, overrides: Overrides) -> ResolvedConfig {
    let file = file.unwrap_or_default();
    let defaults = PipelineConfig::default();
    ResolvedConfig {
        pipeline: PipelineConfig {
            data_dir: overrides
                .data_dir
                .or(file.data_dir)
                .unwrap_or(defaults.data_dir),
            output_dir: overrides
                .output_dir
                .or(file.output_dir)
                .unwrap_or(defaults.output_dir),
            download: overrides.download || file.download.unwrap_or(defaults.download),
        },
        dataset: overrides
            .dataset
            .or(file.dataset)
            .unwrap_or_else(|| DEFAULT_DATASET.to_owned()),
    }
}
