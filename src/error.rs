//! Typed errors for dataset loading and scoring.

use thiserror::Error;

/// A problem with the input data itself.
///
/// Row numbers are 1-based and count data rows only (the header is not a row).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column '{column}' not found in dataset header")]
    MissingColumn { column: String },

    #[error("row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: String },

    #[error("row {row}: column '{column}' is not numeric: '{value}'")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: metric needs a reference reading but none was loaded")]
    MissingReference { row: usize },

    #[error("row {row}: no candidates to score")]
    NoCandidates { row: usize },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
