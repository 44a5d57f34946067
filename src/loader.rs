//! CSV loading and typed row extraction.

use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{Reading, Row};
use crate::config::{CandidateConfig, DatasetConfig};
use crate::error::DataError;

/// Group label used when a dataset has no group column.
pub const DEFAULT_GROUP: &str = "all";

/// A dataset held in memory as raw string cells.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub records: Vec<StringRecord>,
}

impl Table {
    pub fn column(&self, name: &str) -> Result<usize, DataError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads a headed CSV file into a [`Table`].
pub fn load_table(path: &Path) -> Result<Table, DataError> {
    let file = std::fs::File::open(path)?;
    let table = read_table(file)?;
    debug!(path = %path.display(), rows = table.len(), "Loaded table");
    Ok(table)
}

/// Reads headed CSV from any reader into a [`Table`].
///
/// Records may be shorter than the header; their missing trailing cells read as absent.
pub fn read_table<R: Read>(reader: R) -> Result<Table, DataError> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        records.push(result?);
    }

    Ok(Table { headers, records })
}

struct CandidateColumns {
    temperature: (usize, String),
    humidity: (usize, String),
}

impl CandidateColumns {
    fn resolve(table: &Table, candidate: &CandidateConfig) -> Result<Self, DataError> {
        let temperature = table.column(&candidate.temperature_column)?;
        let humidity = table.column(&candidate.humidity_column)?;
        Ok(Self {
            temperature: (temperature, candidate.temperature_column.clone()),
            humidity: (humidity, candidate.humidity_column.clone()),
        })
    }

    fn reading(&self, record: &StringRecord, row: usize) -> Result<Reading, DataError> {
        Ok(Reading {
            temperature: numeric_cell(record, row, &self.temperature)?,
            humidity: numeric_cell(record, row, &self.humidity)?,
        })
    }
}

fn text_cell<'r>(
    record: &'r StringRecord,
    row: usize,
    (index, name): &(usize, String),
) -> Result<&'r str, DataError> {
    match record.get(*index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DataError::MissingValue {
            row,
            column: name.clone(),
        }),
    }
}

fn numeric_cell(
    record: &StringRecord,
    row: usize,
    column: &(usize, String),
) -> Result<f64, DataError> {
    let value = text_cell(record, row, column)?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DataError::NotNumeric {
            row,
            column: column.1.clone(),
            value: value.to_string(),
        }),
    }
}

/// Extracts one typed [`Row`] per record following `dataset`'s layout.
///
/// # Errors
///
/// Fails on the first missing column, empty cell or non-numeric value.
pub fn extract_rows(table: &Table, dataset: &DatasetConfig) -> Result<Vec<Row>, DataError> {
    let candidates = dataset
        .candidates
        .iter()
        .map(|c| CandidateColumns::resolve(table, c))
        .collect::<Result<Vec<_>, _>>()?;
    let reference_columns = dataset
        .reference
        .as_ref()
        .map(|r| CandidateColumns::resolve(table, r))
        .transpose()?;
    let group_column = dataset
        .group_column
        .as_ref()
        .map(|g| table.column(g).map(|i| (i, g.clone())))
        .transpose()?;

    let mut rows = Vec::with_capacity(table.len());
    for (i, record) in table.records.iter().enumerate() {
        let number = i + 1;
        let group = match &group_column {
            Some(column) => text_cell(record, number, column)?.to_string(),
            None => DEFAULT_GROUP.to_string(),
        };
        let readings = candidates
            .iter()
            .map(|c| c.reading(record, number))
            .collect::<Result<Vec<_>, _>>()?;
        let reference = reference_columns
            .as_ref()
            .map(|r| r.reading(record, number))
            .transpose()?;

        rows.push(Row {
            number,
            group,
            readings,
            reference,
        });
    }

    Ok(rows)
}
