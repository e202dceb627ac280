use logprep_core::data_processors::{ColumnCoercion, NumericCoercer};
use logprep_core::models::columns::*;
use logprep_core::models::{Cell, Numeric, Source, Table, UnifiedLogRecord};
use tracing::debug;

use super::{cell_text, Normalizer};

/// Output columns of [`UnswNormalizer`].
pub const UNSW_COLUMNS: &[&str] = &[
    TIMESTAMP,
    SOURCE,
    EVENT_TYPE,
    TOTAL_BYTES,
    TOTAL_PACKETS,
    RAW_MESSAGE,
    LABEL,
];

const LABEL_COLUMN: &str = "label";
const ATTACK_CATEGORY_COLUMN: &str = "attack_cat";

/// `attack_cat` values (trimmed, lower-cased) that mean benign traffic.
const BENIGN_CATEGORIES: &[&str] = &["normal", "benign"];

/// Coerce every column of `table` that is entirely numeric.
///
/// Numeric columns have their text replaced by integer/float cells; the rest
/// are returned untouched. The per-column outcome is returned alongside so
/// callers can see which columns stayed textual.
pub fn coerce_numeric_columns(table: &Table) -> (Table, Vec<(String, ColumnCoercion)>) {
    let mut coerced = table.clone();
    let mut outcomes = Vec::with_capacity(table.columns().len());

    for name in table.columns() {
        let Some(cells) = table.column(name) else {
            continue;
        };
        let outcome = NumericCoercer::coerce_column(cells);
        if let ColumnCoercion::Numeric(values) = &outcome {
            let replaced = values
                .iter()
                .map(|v| v.map(Cell::from).unwrap_or_default())
                .collect();
            coerced.replace_column(name, replaced);
        }
        outcomes.push((name.clone(), outcome));
    }

    (coerced, outcomes)
}

/// Normalizes a UNSW-NB15 flow-feature table.
///
/// Flow records have no time or free-text dimension, so `timestamp` and
/// `raw_message` are always null.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnswNormalizer;

impl UnswNormalizer {
    /// `a + b` over two columns with unparseable cells read as 0, or `None`
    /// when either column is absent.
    fn sum_columns(table: &Table, row: usize, a: &str, b: &str) -> Option<Numeric> {
        let left = table.cell(row, a)?;
        let right = table.cell(row, b)?;
        Some(NumericCoercer::coerce_or_zero(left) + NumericCoercer::coerce_or_zero(right))
    }

    /// Per-row totals of two columns. The whole result is float unless both
    /// columns hold only integers, so one null or fractional operand changes
    /// the type of every row.
    fn sum_column_pair(table: &Table, a: &str, b: &str) -> Vec<Option<Numeric>> {
        let integral = Self::is_integral_column(table, a) && Self::is_integral_column(table, b);
        (0..table.len())
            .map(|row| {
                let total = Self::sum_columns(table, row, a, b)?;
                Some(if integral {
                    total
                } else {
                    Numeric::Float(total.as_f64())
                })
            })
            .collect()
    }

    fn is_integral_column(table: &Table, column: &str) -> bool {
        table
            .column(column)
            .is_some_and(|mut cells| cells.all(|c| matches!(c, Cell::Int(_))))
    }

    /// Binary label. A `label` column wins over `attack_cat`; with neither the
    /// label is absent.
    fn derive_label(table: &Table, row: usize) -> Option<i64> {
        if let Some(cell) = table.cell(row, LABEL_COLUMN) {
            return Some(cell.as_numeric().map(Numeric::truncate).unwrap_or(0));
        }
        if table.has_column(ATTACK_CATEGORY_COLUMN) {
            let category = cell_text(table, row, ATTACK_CATEGORY_COLUMN).unwrap_or_default();
            return Some(Self::label_for_category(&category));
        }
        None
    }

    /// `0` for a benign category, `1` for anything else.
    pub fn label_for_category(category: &str) -> i64 {
        let normalized = category.trim().to_lowercase();
        if BENIGN_CATEGORIES.contains(&normalized.as_str()) {
            0
        } else {
            1
        }
    }
}

impl Normalizer for UnswNormalizer {
    fn source(&self) -> Source {
        Source::Unsw
    }

    fn keep_columns(&self) -> &'static [&'static str] {
        UNSW_COLUMNS
    }

    fn normalize_records(&self, table: &Table) -> Vec<UnifiedLogRecord> {
        let (table, outcomes) = coerce_numeric_columns(table);
        let numeric = outcomes.iter().filter(|(_, o)| o.is_numeric()).count();
        debug!("unsw: {} of {} columns numeric", numeric, outcomes.len());

        let total_bytes = Self::sum_column_pair(&table, "sbytes", "dbytes");
        let total_packets = Self::sum_column_pair(&table, "spkts", "dpkts");

        (0..table.len())
            .map(|row| {
                let mut record = UnifiedLogRecord::new(Source::Unsw);
                record.total_bytes = total_bytes[row];
                record.total_packets = total_packets[row];
                record.label = Self::derive_label(&table, row);
                record.event_type = cell_text(&table, row, ATTACK_CATEGORY_COLUMN);
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        let mut t = Table::with_columns(columns);
        for r in rows {
            t.push_row(
                r.iter()
                    .map(|v| if v.is_empty() { Cell::Null } else { Cell::text(*v) })
                    .collect(),
            );
        }
        t
    }

    // ── coerce_numeric_columns ────────────────────────────────────────────────

    #[test]
    fn test_coerce_numeric_columns_mixed() {
        let t = table(
            &["dur", "proto", "sbytes"],
            &[&["0.5", "tcp", "100"], &["1", "udp", ""]],
        );
        let (coerced, outcomes) = coerce_numeric_columns(&t);

        assert_eq!(coerced.cell(0, "dur"), Some(&Cell::Float(0.5)));
        assert_eq!(coerced.cell(1, "dur"), Some(&Cell::Int(1)));
        assert_eq!(coerced.cell(0, "proto"), Some(&Cell::text("tcp")));
        assert_eq!(coerced.cell(1, "sbytes"), Some(&Cell::Null));
        assert_eq!(
            outcomes[1],
            (
                "proto".to_string(),
                ColumnCoercion::NotNumeric { first_bad_row: 0 }
            )
        );
    }

    // ── totals ────────────────────────────────────────────────────────────────

    #[test]
    fn test_totals_sum_with_zero_fallback() {
        let t = table(
            &["spkts", "dpkts", "sbytes", "dbytes"],
            &[&["2", "4", "496", "0"], &["x", "3", "", "10"]],
        );
        let out = UnswNormalizer.normalize(&t);

        assert_eq!(out.cell(0, TOTAL_BYTES), Some(&Cell::Float(496.0)));
        assert_eq!(out.cell(0, TOTAL_PACKETS), Some(&Cell::Float(6.0)));
        assert_eq!(out.cell(1, TOTAL_BYTES), Some(&Cell::Float(10.0)));
        assert_eq!(out.cell(1, TOTAL_PACKETS), Some(&Cell::Float(3.0)));
    }

    #[test]
    fn test_totals_stay_integer_for_integer_columns() {
        let t = table(
            &["spkts", "dpkts", "sbytes", "dbytes"],
            &[&["2", "4", "496", "0"], &["10", "8", "1110", "354"]],
        );
        let out = UnswNormalizer.normalize(&t);

        assert_eq!(out.cell(0, TOTAL_BYTES), Some(&Cell::Int(496)));
        assert_eq!(out.cell(1, TOTAL_BYTES), Some(&Cell::Int(1464)));
        assert_eq!(out.cell(1, TOTAL_PACKETS), Some(&Cell::Int(18)));
    }

    #[test]
    fn test_totals_one_null_operand_makes_whole_column_float() {
        let t = table(
            &["spkts", "dpkts", "sbytes", "dbytes"],
            &[&["2", "4", "496", "0"], &["1", "1", "", "10"]],
        );
        let out = UnswNormalizer.normalize(&t);

        assert_eq!(out.cell(0, TOTAL_BYTES), Some(&Cell::Float(496.0)));
        assert_eq!(out.cell(0, TOTAL_BYTES).map(|c| c.to_string()), Some("496.0".to_string()));
        assert_eq!(out.cell(1, TOTAL_BYTES), Some(&Cell::Float(10.0)));
        assert_eq!(out.cell(0, TOTAL_PACKETS), Some(&Cell::Int(6)));
    }

    #[test]
    fn test_totals_float_operands() {
        let t = table(&["sbytes", "dbytes"], &[&["1.5", "2"]]);
        let out = UnswNormalizer.normalize(&t);
        assert_eq!(out.cell(0, TOTAL_BYTES), Some(&Cell::Float(3.5)));
    }

    #[test]
    fn test_totals_null_when_a_column_is_missing() {
        let t = table(&["sbytes", "spkts", "dpkts"], &[&["10", "1", "1"]]);
        let out = UnswNormalizer.normalize(&t);
        assert_eq!(out.cell(0, TOTAL_BYTES), Some(&Cell::Null));
        assert_eq!(out.cell(0, TOTAL_PACKETS), Some(&Cell::Int(2)));
    }

    // ── labels ────────────────────────────────────────────────────────────────

    #[test]
    fn test_label_column_wins_over_attack_cat() {
        let t = table(&["attack_cat", "label"], &[&["normal", "1"]]);
        let out = UnswNormalizer.normalize(&t);
        assert_eq!(out.cell(0, LABEL), Some(&Cell::Int(1)));
        assert_eq!(out.cell(0, EVENT_TYPE), Some(&Cell::text("normal")));
    }

    #[test]
    fn test_label_column_non_numeric_is_zero() {
        let t = table(&["label"], &[&["yes"], &["0.9"], &[""]]);
        let out = UnswNormalizer.normalize(&t);
        assert_eq!(out.cell(0, LABEL), Some(&Cell::Int(0)));
        assert_eq!(out.cell(1, LABEL), Some(&Cell::Int(0)));
        assert_eq!(out.cell(2, LABEL), Some(&Cell::Int(0)));
    }

    #[test]
    fn test_label_from_attack_cat() {
        let t = table(
            &["attack_cat"],
            &[&[" Normal "], &["BENIGN"], &["Exploits"], &[""]],
        );
        let out = UnswNormalizer.normalize(&t);
        let labels: Vec<&Cell> = out.column(LABEL).unwrap().collect();
        assert_eq!(
            labels,
            vec![&Cell::Int(0), &Cell::Int(0), &Cell::Int(1), &Cell::Int(1)]
        );
        assert_eq!(out.cell(3, EVENT_TYPE), Some(&Cell::Null));
    }

    #[test]
    fn test_label_absent_without_source_columns() {
        let t = table(&["sbytes", "dbytes"], &[&["1", "1"]]);
        let out = UnswNormalizer.normalize(&t);
        assert_eq!(out.cell(0, LABEL), Some(&Cell::Null));
        assert_eq!(out.cell(0, EVENT_TYPE), Some(&Cell::Null));
    }

    #[test]
    fn test_normalize_exact_columns_and_nulls() {
        let t = table(&["id", "label"], &[&["1", "0"]]);
        let out = UnswNormalizer.normalize(&t);
        assert_eq!(out.columns(), UNSW_COLUMNS);
        assert_eq!(out.cell(0, TIMESTAMP), Some(&Cell::Null));
        assert_eq!(out.cell(0, RAW_MESSAGE), Some(&Cell::Null));
        assert_eq!(out.cell(0, SOURCE), Some(&Cell::text("unsw")));
    }
}
