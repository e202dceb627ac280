//! Per-source normalizers mapping raw tables into the unified schema.

mod apache;
mod ssh;
mod unsw;

pub use apache::{ApacheNormalizer, APACHE_COLUMNS};
pub use ssh::{SshNormalizer, SSH_COLUMNS};
pub use unsw::{coerce_numeric_columns, UnswNormalizer, UNSW_COLUMNS};

use logprep_core::models::{records_to_table, Source, Table, UnifiedLogRecord};
use tracing::debug;

/// Maps one source-specific table shape into [`UnifiedLogRecord`]s.
///
/// Implementations never fail: unusable values degrade to null or a default.
pub trait Normalizer {
    /// The source stamped on every produced record.
    fn source(&self) -> Source;

    /// The exact output column set, in output order.
    fn keep_columns(&self) -> &'static [&'static str];

    /// One record per input row, in input order.
    fn normalize_records(&self, table: &Table) -> Vec<UnifiedLogRecord>;

    /// Normalize `table` into a table holding exactly
    /// [`keep_columns`](Normalizer::keep_columns).
    fn normalize(&self, table: &Table) -> Table {
        let records = self.normalize_records(table);
        debug!(
            "{}: normalized {} of {} rows",
            self.source(),
            records.len(),
            table.len()
        );
        records_to_table(&records, self.keep_columns())
    }
}

/// Text of the cell at (`row`, `column`); `None` for a missing column or a
/// null cell.
pub(crate) fn cell_text(table: &Table, row: usize, column: &str) -> Option<String> {
    table.cell(row, column).and_then(|c| c.to_text())
}
