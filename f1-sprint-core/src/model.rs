//! Typed records for the three source tables and the tables derived from them.

use chrono::NaiveDate;
use serde::Serialize;

use crate::table::RawTable;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of `sprint_results.csv` after cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub result_id: i64,
    pub race_id: i64,
    pub driver_id: i64,
    /// Always `Some` after cleaning; rows without a numeric position are dropped.
    pub position: Option<i32>,
    pub position_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverRecord {
    pub driver_id: i64,
    pub forename: String,
    pub surname: String,
    pub dob: Option<NaiveDate>,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceRecord {
    pub race_id: i64,
    pub year: Option<i32>,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub sprint_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SprintResultsTable {
    pub records: Vec<ResultRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriversTable {
    pub records: Vec<DriverRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RacesTable {
    pub records: Vec<RaceRecord>,
    /// False when the source had neither a `year` nor a `date` column.
    pub has_year: bool,
}

/// A sprint winner joined with its race and driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedWinRecord {
    pub result_id: i64,
    pub race_id: i64,
    pub driver_id: i64,
    pub position: Option<i32>,
    pub position_order: i32,
    pub year: i32,
    pub race_name: String,
    pub forename: String,
    pub surname: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintWinCount {
    pub driver_name: String,
    pub sprint_wins: i64,
}

/// One row of `sprint_wins.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintWinSummary {
    pub driver_name: String,
    pub sprint_wins: i64,
    pub latest_win_year: i32,
}

/// Number of sprint wins (one per sprint race) recorded in a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn headers(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| c.to_string()).collect()
}

impl SprintResultsTable {
    /// Renders the cleaned table back into canonical raw form.
    pub fn to_raw(&self, name: &str) -> RawTable {
        let columns = headers(&["resultId", "raceId", "driverId", "position", "positionOrder"]);
        let rows = self
            .records
            .iter()
            .map(|r| {
                vec![
                    r.result_id.to_string(),
                    r.race_id.to_string(),
                    r.driver_id.to_string(),
                    opt_cell(r.position),
                    r.position_order.to_string(),
                ]
            })
            .collect();
        RawTable::from_parts(name, columns, rows)
    }
}

impl DriversTable {
    pub fn to_raw(&self, name: &str) -> RawTable {
        let columns = headers(&["driverId", "forename", "surname", "dob", "fullName"]);
        let rows = self
            .records
            .iter()
            .map(|d| {
                vec![
                    d.driver_id.to_string(),
                    d.forename.clone(),
                    d.surname.clone(),
                    date_cell(d.dob),
                    d.full_name.clone(),
                ]
            })
            .collect();
        RawTable::from_parts(name, columns, rows)
    }
}

impl RacesTable {
    /// The year and date columns are omitted when the table carries no year,
    /// so that cleaning the result again reproduces this table.
    pub fn to_raw(&self, name: &str) -> RawTable {
        let columns = if self.has_year {
            headers(&["raceId", "year", "name", "date", "sprintDate"])
        } else {
            headers(&["raceId", "name", "sprintDate"])
        };
        let rows = self
            .records
            .iter()
            .map(|r| {
                if self.has_year {
                    vec![
                        r.race_id.to_string(),
                        opt_cell(r.year),
                        r.name.clone(),
                        date_cell(r.date),
                        date_cell(r.sprint_date),
                    ]
                } else {
                    vec![r.race_id.to_string(), r.name.clone(), date_cell(r.sprint_date)]
                }
            })
            .collect();
        RawTable::from_parts(name, columns, rows)
    }
}
