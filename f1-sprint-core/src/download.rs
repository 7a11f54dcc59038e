use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::contract::{DownloadError, Downloader};

pub const DEFAULT_DATASET: &str = "rohanrao/formula-1-world-championship-1950-2020";

/// Downloads a Kaggle dataset through the `kaggle` command line client.
///
/// Credentials are read by the client itself, from `KAGGLE_USERNAME` /
/// `KAGGLE_KEY` or `~/.kaggle/kaggle.json`.
#[derive(Debug, Clone)]
pub struct KaggleDownloader {
    dataset: String,
    program: PathBuf,
}

impl KaggleDownloader {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            program: PathBuf::from("kaggle"),
        }
    }

    /// Uses another executable in place of `kaggle`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for KaggleDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET)
    }
}

#[async_trait::async_trait]
impl Downloader for KaggleDownloader {
    async fn download(&self, output_dir: &Path) -> Result<PathBuf, DownloadError> {
        tracing::info!(
            dataset = %self.dataset,
            path = %output_dir.display(),
            "Downloading dataset from Kaggle"
        );

        if !output_dir.exists() {
            if let Err(e) = fs::create_dir_all(output_dir) {
                tracing::error!(
                    error = ?e,
                    path = %output_dir.display(),
                    "Failed to create output directory"
                );
                return Err(e.into());
            } else {
                tracing::debug!(path = %output_dir.display(), "Created output directory");
            }
        }

        // `kaggle datasets download -d <dataset> -p <output_dir> --unzip`
        let status = Command::new(&self.program)
            .arg("datasets")
            .arg("download")
            .arg("-d")
            .arg(&self.dataset)
            .arg("-p")
            .arg(output_dir)
            .arg("--unzip")
            .status();

        match status {
            Ok(s) if s.success() => {
                tracing::info!(
                    dataset = %self.dataset,
                    path = %output_dir.display(),
                    "Dataset downloaded successfully"
                );
                Ok(output_dir.to_path_buf())
            }
            Ok(s) => {
                tracing::error!(
                    dataset = %self.dataset,
                    path = %output_dir.display(),
                    "Kaggle exited with non-zero code: {}", s
                );
                Err(format!("kaggle exited with {s} while downloading {}", self.dataset).into())
            }
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    program = %self.program.display(),
                    "Failed to launch kaggle process"
                );
                Err(format!("failed to launch {}: {e}", self.program.display()).into())
            }
        }
    }
}
