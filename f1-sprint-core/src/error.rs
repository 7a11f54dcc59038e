//! Error taxonomy for the sprint wins pipeline.
//!
//! Every variant is fatal: the pipeline stops at the first one and writes no
//! output. Non-fatal conditions (null values in required columns, dates that
//! do not parse) are logged and returned in reports instead of raised here.

use std::path::PathBuf;

use thiserror::Error;

use crate::contract::{DownloadError, ReportError};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// File missing, unreadable or unwritable.
    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited content (missing header, inconsistent column counts, bad encoding).
    #[error("malformed content in {table} at line {line}: {message}")]
    Parse {
        table: String,
        line: u64,
        message: String,
    },

    #[error("{table} is missing required columns: {missing:?}")]
    Schema { table: String, missing: Vec<String> },

    #[error("{table} is empty")]
    EmptyTable { table: String },

    /// A value that validation should have guaranteed castable was not.
    #[error("{table}.{column} at row {row}: cannot coerce {value:?} to {expected}")]
    TypeCoercion {
        table: String,
        column: String,
        row: usize,
        value: Option<String>,
        expected: &'static str,
    },

    #[error("internal invariant violated: {0}")]
    LogicInvariant(String),

    #[error("dataset download failed: {0}")]
    Download(DownloadError),

    #[error("report rendering failed: {0}")]
    Report(ReportError),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
