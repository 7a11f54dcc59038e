//! Validator: the gate between loading and cleaning.
//!
//! Checks run in order: the table has rows, then every required column is
//! present. Null cells in required columns are counted and reported as
//! warnings; they never fail validation on their own.

use tracing::{error, info, warn};

use crate::error::PipelineError;
use crate::table::RawTable;

pub const SPRINT_RESULTS_COLUMNS: &[&str] =
    &["resultId", "raceId", "driverId", "position", "positionOrder"];
pub const DRIVERS_COLUMNS: &[&str] = &["driverId", "forename", "surname"];
pub const RACES_COLUMNS: &[&str] = &["raceId", "year", "name"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    Empty,
    MissingColumns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub table: String,
    pub failure: Option<ValidationFailure>,
    /// Required columns holding nulls, with their null count, in required-column order.
    pub null_counts: Vec<(String, usize)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts a failed report into the matching fatal error.
    pub fn into_result(self) -> Result<(), PipelineError> {
        match self.failure {
            None => Ok(()),
            Some(ValidationFailure::Empty) => Err(PipelineError::EmptyTable { table: self.table }),
            Some(ValidationFailure::MissingColumns(missing)) => Err(PipelineError::Schema {
                table: self.table,
                missing,
            }),
        }
    }
}

pub fn validate_table(table: &RawTable, required_columns: &[&str], name: &str) -> ValidationReport {
    info!(table = name, "Validating");

    let mut report = ValidationReport {
        table: name.to_owned(),
        failure: None,
        null_counts: Vec::new(),
    };

    if table.is_empty() {
        error!(table = name, "Table is empty");
        report.failure = Some(ValidationFailure::Empty);
        return report;
    }

    let missing: Vec<String> = required_columns
        .iter()
        .filter(|column| !table.has_column(column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        error!(table = name, missing = ?missing, "Table is missing required columns");
        report.failure = Some(ValidationFailure::MissingColumns(missing));
        return report;
    }

    for column in required_columns {
        let nulls = table.null_count(column).unwrap_or(0);
        if nulls > 0 {
            warn!(
                table = name,
                column = *column,
                null_count = nulls,
                "Null values in required column"
            );
            report.null_counts.push((column.to_string(), nulls));
        }
    }

    info!(table = name, "Validation passed");
    report
}

pub fn validate_sprint_results(table: &RawTable) -> ValidationReport {
    validate_table(table, SPRINT_RESULTS_COLUMNS, "Sprint Results")
}

pub fn validate_drivers(table: &RawTable) -> ValidationReport {
    validate_table(table, DRIVERS_COLUMNS, "Drivers")
}

pub fn validate_races(table: &RawTable) -> ValidationReport {
    validate_table(table, RACES_COLUMNS, "Races")
}
