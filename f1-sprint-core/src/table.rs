//! Loader: delimited files into an untyped, header-addressed table.
//!
//! A [`RawTable`] keeps every cell as text, exactly as read. Typing happens in
//! [`crate::cleaning`], after [`crate::validation`] has checked the header.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{error, info};

use crate::error::{PipelineError, Result};

/// Cell spellings treated as null, matching what common dataframe readers
/// recognise by default. `\N` is not one of them; numeric coercion drops it.
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_null(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Rows must already match the header width.
    pub(crate) fn from_parts(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_owned(),
            headers,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Cells of one column, top to bottom. `None` if the column is absent.
    pub fn column<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a str> + 'a> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| row[index].as_str()))
    }

    /// Number of null cells in a column, or `None` if the column is absent.
    pub fn null_count(&self, column: &str) -> Option<usize> {
        self.column(column)
            .map(|cells| cells.filter(|cell| is_null(cell)).count())
    }
}

/// Loads `filename` from `data_path`. The table is named after the file.
pub fn load_csv_data(data_path: &Path, filename: &str) -> Result<RawTable> {
    let file_path = data_path.join(filename);
    info!(path = %file_path.display(), "Loading data");

    let file = File::open(&file_path).map_err(|e| {
        error!(path = %file_path.display(), error = %e, "Failed to open data file");
        PipelineError::io(&file_path, e)
    })?;

    let table = read_table(filename, file).map_err(|e| match e {
        PipelineError::Io { source, .. } => PipelineError::io(&file_path, source),
        other => other,
    })?;
    info!(
        table = filename,
        rows = table.len(),
        columns = table.headers().len(),
        "Loaded table"
    );
    Ok(table)
}

/// Parses comma separated text with a mandatory header row.
pub fn read_table<R: Read>(name: &str, reader: R) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(name, e))?
        .iter()
        .map(str::to_owned)
        .collect();
    if headers.is_empty() {
        return Err(PipelineError::Parse {
            table: name.to_owned(),
            line: 1,
            message: "missing header row".to_owned(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(name, e))?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(RawTable {
        name: name.to_owned(),
        headers,
        rows,
    })
}

fn csv_error(table: &str, err: csv::Error) -> PipelineError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PipelineError::io(table, source),
        _ => PipelineError::Parse {
            table: table.to_owned(),
            line,
            message,
        },
    }
}
