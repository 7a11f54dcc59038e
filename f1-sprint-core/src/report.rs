//! The tabular artifact: `sprint_wins.csv`, plus a plain text rendering for terminals.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::model::SprintWinSummary;

pub const SPRINT_WINS_FILE: &str = "sprint_wins.csv";
pub const SPRINT_WINS_HEADER: [&str; 3] = ["driverName", "sprintWins", "latestWinYear"];

/// `sprint_wins.csv` written to a temporary file next to its final path.
///
/// Nothing appears at the final path until [`StagedCsv::commit`]. Dropping a
/// staged file without committing removes it.
#[derive(Debug)]
pub struct StagedCsv {
    file: NamedTempFile,
    target: PathBuf,
}

impl StagedCsv {
    /// Moves the staged file onto its final path, replacing any previous file.
    pub fn commit(self) -> Result<PathBuf> {
        let target = self.target;
        self.file
            .persist(&target)
            .map_err(|e| PipelineError::io(&target, e.error))?;
        info!(path = %target.display(), "Saved processed data");
        Ok(target)
    }
}

/// Serializes the summary into a staged `sprint_wins.csv` inside `output_dir`.
pub fn stage_sprint_wins(summary: &[SprintWinSummary], output_dir: &Path) -> Result<StagedCsv> {
    fs::create_dir_all(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;
    let target = output_dir.join(SPRINT_WINS_FILE);

    let file = NamedTempFile::new_in(output_dir).map_err(|e| PipelineError::io(output_dir, e))?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file.as_file());
        let to_io = |e: csv::Error| PipelineError::io(&target, io::Error::from(e));
        writer.write_record(SPRINT_WINS_HEADER).map_err(to_io)?;
        for row in summary {
            writer.serialize(row).map_err(to_io)?;
        }
        writer.flush().map_err(|e| PipelineError::io(&target, e))?;
    }

    debug!(path = %target.display(), rows = summary.len(), "Staged processed data");
    Ok(StagedCsv { file, target })
}

/// Aligned text table of the summary, header first.
pub fn format_summary_table(summary: &[SprintWinSummary]) -> String {
    let name_width = summary
        .iter()
        .map(|row| row.driver_name.chars().count())
        .chain(std::iter::once(SPRINT_WINS_HEADER[0].len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<name_width$}  {:>10}  {:>13}",
        SPRINT_WINS_HEADER[0], SPRINT_WINS_HEADER[1], SPRINT_WINS_HEADER[2]
    );
    for row in summary {
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>10}  {:>13}",
            row.driver_name, row.sprint_wins, row.latest_win_year
        );
    }
    out
}
