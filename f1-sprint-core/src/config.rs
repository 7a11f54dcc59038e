use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding (or receiving) the raw csv files.
    pub data_dir: PathBuf,
    /// Directory for `sprint_wins.csv` and the charts.
    pub output_dir: PathBuf,
    /// Fetch the dataset into `data_dir` before running.
    pub download: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/raw"),
            output_dir: PathBuf::from("data/processed"),
            download: false,
        }
    }
}

impl PipelineConfig {
    pub fn trace_loaded(&self) {
        info!(
            data_dir = %self.data_dir.display(),
            output_dir = %self.output_dir.display(),
            download = self.download,
            "Loaded PipelineConfig"
        );
        debug!(?self, "PipelineConfig loaded (full debug)");
    }
}
