//! # contract: interfaces to the collaborators around the pipeline
//!
//! The pipeline itself only loads, validates, cleans and aggregates. Getting
//! the raw files onto disk and turning the final tables into charts are
//! delegated through the two traits below, so either side can be swapped for
//! a real implementation (Kaggle download, PNG rendering) or a mock.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`; `MockDownloader` and
//!   `MockReporter` are exported with the default `test-export-mocks` feature.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::model::{SprintWinSummary, YearCount};

/// Error type for Downloader trait (simple boxed error for now)
pub type DownloadError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for Reporter trait.
pub type ReportError = Box<dyn std::error::Error + Send + Sync>;

/// Fetches the raw dataset files.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads the dataset into `output_dir` and returns the directory that
    /// holds `sprint_results.csv`, `drivers.csv` and `races.csv`.
    async fn download(&self, output_dir: &Path) -> Result<PathBuf, DownloadError>;
}

/// Renders the final tables into chart artifacts.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait Reporter: Send + Sync {
    /// Writes the charts into `output_dir` and returns the paths written.
    fn render(
        &self,
        summary: &[SprintWinSummary],
        wins_by_year: &[YearCount],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ReportError>;
}
