//! Cleaner: typed, trimmed, coerced tables from validated raw tables.
//!
//! The three transforms are independent and never touch their input.
//!
//! Coercion rules:
//! - `position` is numeric or the row is dropped (`"DNF"`, `"\N"` and nulls all drop).
//! - identifier and rank columns must parse as integers; anything else is a
//!   [`PipelineError::TypeCoercion`].
//! - dates that do not parse become `None` and are counted, never raised.

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::model::{
    DriverRecord, DriversTable, RaceRecord, RacesTable, ResultRecord, SprintResultsTable,
};
use crate::table::{is_null, RawTable};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const SPRINT_DATE_COLUMNS: &[&str] = &["sprintDate", "sprint_date"];

/// A cleaned table plus what cleaning threw away or nulled out on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutcome<T> {
    pub table: T,
    pub dropped_rows: usize,
    /// Non-null cells that failed to parse and were replaced by null.
    pub coerced_to_null: usize,
}

/// Parses a date cell, accepting plain dates and timestamps.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if is_null(cell) {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(cell, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(cell).ok().map(|dt| dt.date_naive()))
}

/// Lenient numeric coercion: integers, or floats with no fractional part.
pub fn coerce_integer<T>(cell: &str) -> Option<T>
where
    T: FromStr + TryFrom<i64>,
{
    let cell = cell.trim();
    if is_null(cell) {
        return None;
    }
    if let Ok(value) = cell.parse::<T>() {
        return Some(value);
    }
    let float = cell.parse::<f64>().ok()?;
    if !float.is_finite() || float.fract() != 0.0 || float.abs() > i64::MAX as f64 {
        return None;
    }
    T::try_from(float as i64).ok()
}

fn column_index(table: &RawTable, name: &str, column: &str) -> Result<usize> {
    table.column_index(column).ok_or_else(|| PipelineError::Schema {
        table: name.to_owned(),
        missing: vec![column.to_owned()],
    })
}

fn required_integer<T>(table: &str, column: &str, row: usize, cell: &str) -> Result<T>
where
    T: FromStr + TryFrom<i64>,
{
    coerce_integer(cell).ok_or_else(|| PipelineError::TypeCoercion {
        table: table.to_owned(),
        column: column.to_owned(),
        row,
        value: (!is_null(cell.trim())).then(|| cell.to_owned()),
        expected: "integer",
    })
}

fn text(cell: &str) -> String {
    if is_null(cell) {
        String::new()
    } else {
        cell.to_owned()
    }
}

/// Drops rows whose `position` is not numeric and types the id columns.
pub fn clean_sprint_results(raw: &RawTable) -> Result<CleanOutcome<SprintResultsTable>> {
    const TABLE: &str = "Sprint Results";
    info!(table = TABLE, "Cleaning");

    let result_id = column_index(raw, TABLE, "resultId")?;
    let race_id = column_index(raw, TABLE, "raceId")?;
    let driver_id = column_index(raw, TABLE, "driverId")?;
    let position = column_index(raw, TABLE, "position")?;
    let position_order = column_index(raw, TABLE, "positionOrder")?;

    let mut records = Vec::with_capacity(raw.len());
    let mut dropped_rows = 0;
    for (row, cells) in raw.rows().iter().enumerate() {
        let Some(pos) = coerce_integer::<i32>(&cells[position]) else {
            dropped_rows += 1;
            continue;
        };
        records.push(ResultRecord {
            result_id: required_integer(TABLE, "resultId", row, &cells[result_id])?,
            race_id: required_integer(TABLE, "raceId", row, &cells[race_id])?,
            driver_id: required_integer(TABLE, "driverId", row, &cells[driver_id])?,
            position: Some(pos),
            position_order: required_integer(TABLE, "positionOrder", row, &cells[position_order])?,
        });
    }

    info!(
        table = TABLE,
        dropped_rows,
        rows = records.len(),
        "Removed rows with missing position values"
    );
    Ok(CleanOutcome {
        table: SprintResultsTable { records },
        dropped_rows,
        coerced_to_null: 0,
    })
}

/// Trims names, parses `dob` and derives `fullName`.
pub fn clean_drivers_data(raw: &RawTable) -> Result<CleanOutcome<DriversTable>> {
    const TABLE: &str = "Drivers";
    info!(table = TABLE, "Cleaning");

    let driver_id = column_index(raw, TABLE, "driverId")?;
    let forename = column_index(raw, TABLE, "forename")?;
    let surname = column_index(raw, TABLE, "surname")?;
    let dob = raw.column_index("dob");

    let mut records = Vec::with_capacity(raw.len());
    let mut coerced_to_null = 0;
    for (row, cells) in raw.rows().iter().enumerate() {
        let first = text(cells[forename].trim());
        let last = text(cells[surname].trim());
        let birth = dob.and_then(|i| {
            let parsed = parse_date(&cells[i]);
            if parsed.is_none() && !is_null(cells[i].trim()) {
                coerced_to_null += 1;
            }
            parsed
        });
        records.push(DriverRecord {
            driver_id: required_integer(TABLE, "driverId", row, &cells[driver_id])?,
            full_name: format!("{first} {last}"),
            forename: first,
            surname: last,
            dob: birth,
        });
    }

    if coerced_to_null > 0 {
        warn!(
            table = TABLE,
            column = "dob",
            count = coerced_to_null,
            "Unparsable dates set to null"
        );
    }
    info!(table = TABLE, rows = records.len(), "Cleaned");
    Ok(CleanOutcome {
        table: DriversTable { records },
        dropped_rows: 0,
        coerced_to_null,
    })
}

/// Parses the date columns and fills `year` from `date` where it is missing.
pub fn clean_races_data(raw: &RawTable) -> Result<CleanOutcome<RacesTable>> {
    const TABLE: &str = "Races";
    info!(table = TABLE, "Cleaning");

    let race_id = column_index(raw, TABLE, "raceId")?;
    let name = raw.column_index("name");
    let year = raw.column_index("year");
    let date = raw.column_index("date");
    let sprint_date = SPRINT_DATE_COLUMNS
        .iter()
        .find_map(|column| raw.column_index(column));

    if year.is_none() {
        match date {
            Some(_) => info!(table = TABLE, "No year column, deriving year from date"),
            None => warn!(table = TABLE, "Neither year nor date column present"),
        }
    }

    let mut records = Vec::with_capacity(raw.len());
    let mut coerced_to_null = 0;
    let mut parse_counted = |cell: &str| {
        let parsed = parse_date(cell);
        if parsed.is_none() && !is_null(cell.trim()) {
            coerced_to_null += 1;
        }
        parsed
    };
    for (row, cells) in raw.rows().iter().enumerate() {
        let race_date = date.and_then(|i| parse_counted(&cells[i]));
        let race_sprint_date = sprint_date.and_then(|i| parse_counted(&cells[i]));
        let stated_year = match year {
            Some(i) if !is_null(cells[i].trim()) => {
                Some(required_integer::<i32>(TABLE, "year", row, &cells[i])?)
            }
            _ => None,
        };
        records.push(RaceRecord {
            race_id: required_integer(TABLE, "raceId", row, &cells[race_id])?,
            year: stated_year.or_else(|| race_date.map(|d| d.year())),
            name: name.map(|i| text(&cells[i])).unwrap_or_default(),
            date: race_date,
            sprint_date: race_sprint_date,
        });
    }

    if coerced_to_null > 0 {
        warn!(table = TABLE, count = coerced_to_null, "Unparsable dates set to null");
    }
    info!(table = TABLE, rows = records.len(), "Cleaned");
    Ok(CleanOutcome {
        table: RacesTable {
            records,
            has_year: year.is_some() || date.is_some(),
        },
        dropped_rows: 0,
        coerced_to_null,
    })
}
