//! Null-value audit over a raw [`Table`].

use serde::Serialize;
use tracing::{info, warn};

use crate::loader::Table;

/// Missing-cell count for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnNulls {
    pub column: String,
    pub nulls: usize,
    pub percent: f64,
}

/// A data row that has at least one null cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullRow {
    pub row: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullReport {
    pub rows: usize,
    pub total_nulls: usize,
    pub columns: Vec<ColumnNulls>,
    pub null_rows: Vec<NullRow>,
}

impl NullReport {
    pub fn is_clean(&self) -> bool {
        self.total_nulls == 0
    }

    /// Emits the report through `tracing`.
    pub fn log(&self, dataset: &str) {
        if self.is_clean() {
            info!(dataset, rows = self.rows, "No null values found");
            return;
        }

        warn!(
            dataset,
            rows = self.rows,
            total_nulls = self.total_nulls,
            rows_with_nulls = self.null_rows.len(),
            "Dataset contains null values"
        );
        for c in self.columns.iter().filter(|c| c.nulls > 0) {
            warn!(
                dataset,
                column = %c.column,
                nulls = c.nulls,
                percent = %format!("{:.2}", c.percent),
                "Null values in column"
            );
        }
        for r in &self.null_rows {
            warn!(dataset, row = r.row, columns = ?r.columns, "Row has null values");
        }
    }
}

// Markers read as NA by default in pandas `read_csv`.
const NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns `true` for an empty cell or a conventional NA marker such as `NA` or `n/a`.
pub fn is_null_marker(cell: &str) -> bool {
    cell.is_empty() || NULL_MARKERS.contains(&cell)
}

/// Counts null cells per column and lists the rows that contain them.
///
/// A cell missing from a short record counts as null.
pub fn audit(table: &Table) -> NullReport {
    let mut counts = vec![0usize; table.headers.len()];
    let mut null_rows = Vec::new();

    for (i, record) in table.records.iter().enumerate() {
        let mut columns = Vec::new();
        for (col, header) in table.headers.iter().enumerate() {
            if record.get(col).is_none_or(is_null_marker) {
                counts[col] += 1;
                columns.push(header.clone());
            }
        }
        if !columns.is_empty() {
            null_rows.push(NullRow { row: i + 1, columns });
        }
    }

    let rows = table.len();
    let columns = table
        .headers
        .iter()
        .zip(&counts)
        .map(|(column, &nulls)| ColumnNulls {
            column: column.clone(),
            nulls,
            percent: if rows == 0 {
                0.0
            } else {
                nulls as f64 / rows as f64 * 100.0
            },
        })
        .collect();

    NullReport {
        rows,
        total_nulls: counts.iter().sum(),
        columns,
        null_rows,
    }
}
