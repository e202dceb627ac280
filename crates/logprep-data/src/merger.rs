//! Schema alignment and concatenation of normalized tables.

use std::collections::BTreeSet;

use logprep_core::models::Table;
use tracing::debug;

/// Stateless helper that unions heterogeneous tables into one.
pub struct SchemaAligner;

impl SchemaAligner {
    /// Lexicographically sorted union of every table's column names.
    pub fn union_columns<'a, I>(tables: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Table>,
    {
        tables
            .into_iter()
            .flat_map(|t| t.columns().iter().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    /// Reindex every table to the union schema and concatenate them in the
    /// given order, keeping each table's row order.
    ///
    /// Returns `None` when `tables` is empty.
    pub fn merge<'a, I>(tables: I) -> Option<Table>
    where
        I: IntoIterator<Item = &'a Table>,
    {
        let tables: Vec<&Table> = tables.into_iter().collect();
        if tables.is_empty() {
            return None;
        }

        let columns = Self::union_columns(tables.iter().copied());
        let mut merged = Table::new(columns.clone());
        for table in &tables {
            merged.append(&table.reindex(&columns));
        }

        debug!(
            "Merged {} tables into {} rows x {} columns",
            tables.len(),
            merged.len(),
            columns.len()
        );

        Some(merged)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use logprep_core::models::Cell;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        let mut t = Table::with_columns(columns);
        for r in rows {
            t.push_row(r);
        }
        t
    }

    #[test]
    fn test_union_columns_sorted_and_deduplicated() {
        let a = table(&["b", "a"], vec![]);
        let b = table(&["c", "b"], vec![]);
        assert_eq!(SchemaAligner::union_columns([&a, &b]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_fills_missing_columns_with_null() {
        let a = table(&["a", "b"], vec![vec![Cell::Int(1), Cell::Int(2)]]);
        let b = table(&["b", "c"], vec![vec![Cell::Int(3), Cell::Int(4)]]);

        let merged = SchemaAligner::merge([&a, &b]).unwrap();
        assert_eq!(merged.columns(), &["a", "b", "c"]);
        assert_eq!(
            merged.rows(),
            &[
                vec![Cell::Int(1), Cell::Int(2), Cell::Null],
                vec![Cell::Null, Cell::Int(3), Cell::Int(4)],
            ]
        );
    }

    #[test]
    fn test_merge_preserves_table_and_row_order() {
        let first = table(&["x"], vec![vec![Cell::text("1")], vec![Cell::text("2")]]);
        let second = table(&["x"], vec![vec![Cell::text("3")]]);

        let merged = SchemaAligner::merge([&first, &second]).unwrap();
        let values: Vec<String> = merged
            .column("x")
            .unwrap()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(values, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_merge_single_table_sorts_columns() {
        let only = table(&["z", "a"], vec![vec![Cell::Int(1), Cell::Int(2)]]);
        let merged = SchemaAligner::merge([&only]).unwrap();
        assert_eq!(merged.columns(), &["a", "z"]);
        assert_eq!(merged.rows()[0], vec![Cell::Int(2), Cell::Int(1)]);
    }

    #[test]
    fn test_merge_empty_is_none() {
        assert!(SchemaAligner::merge(std::iter::empty::<&Table>()).is_none());
    }

    #[test]
    fn test_merge_skips_absent_sources() {
        let present = table(&["a"], vec![vec![Cell::Int(1)]]);
        let absent: Option<Table> = None;
        let merged =
            SchemaAligner::merge([Some(&present), absent.as_ref()].into_iter().flatten()).unwrap();
        assert_eq!(merged.len(), 1);
    }
}
