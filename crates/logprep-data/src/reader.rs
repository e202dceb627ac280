//! CSV loading and writing for logprep.
//!
//! Inputs are read whole into a [`Table`]; every non-missing field is kept as
//! text so that numeric interpretation stays an explicit, per-column step.

use std::path::Path;

use logprep_core::models::{Cell, Table};
use logprep_core::{PrepError, Result};
use tracing::{debug, error, warn};

/// Field values read as null, in addition to the empty field.
const NA_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "<NA>", "NULL", "null", "None", "#N/A",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a CSV file into a [`Table`], or `None` when the source should be
/// skipped.
///
/// A missing file logs a warning; a malformed one logs an error. Neither
/// propagates.
pub fn load_table(path: &Path, row_limit: Option<usize>) -> Option<Table> {
    match try_load_table(path, row_limit) {
        Ok(table) => Some(table),
        Err(PrepError::FileMissing(missing)) => {
            warn!("file not found: {}", missing.display());
            None
        }
        Err(e) => {
            error!("reading {}: {}", path.display(), e);
            None
        }
    }
}

/// Fallible form of [`load_table`].
///
/// # Errors
/// [`PrepError::FileMissing`] when `path` does not exist and
/// [`PrepError::Parse`] when the content is not well-formed CSV (no header,
/// a row longer than the header, invalid UTF-8). Rows shorter than the
/// header are kept with the missing trailing fields null.
pub fn try_load_table(path: &Path, row_limit: Option<usize>) -> Result<Table> {
    if !path.exists() {
        return Err(PrepError::FileMissing(path.to_path_buf()));
    }

    let parse_err = |source: csv::Error| PrepError::Parse {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(parse_err)?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(parse_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if columns.iter().all(|c| c.is_empty()) {
        return Err(parse_err(invalid_data("no columns to parse from file".to_string())));
    }

    let width = columns.len();
    let mut table = Table::new(columns);
    let limit = row_limit.unwrap_or(usize::MAX);

    // Short rows are padded with nulls by `push_row`; long rows are malformed.
    for (index, record) in reader.records().take(limit).enumerate() {
        let record = record.map_err(parse_err)?;
        if record.len() > width {
            return Err(parse_err(invalid_data(format!(
                "data row {} has {} fields, but the header has {}",
                index + 1,
                record.len(),
                width
            ))));
        }
        table.push_row(record.iter().map(field_to_cell).collect());
    }

    debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );

    Ok(table)
}

/// Write `table` to `path` as CSV: a header row, then one line per row with
/// nulls as empty fields.
///
/// # Errors
/// [`PrepError::FileWrite`] when the file cannot be created or written.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    let write_err = |source: csv::Error| PrepError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer.write_record(table.columns()).map_err(write_err)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(write_err)?;
    }
    writer.flush().map_err(|e| write_err(csv::Error::from(e)))?;

    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn invalid_data(message: String) -> csv::Error {
    csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

fn field_to_cell(field: &str) -> Cell {
    if field.is_empty() || NA_MARKERS.contains(&field) {
        Cell::Null
    } else {
        Cell::text(field)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
