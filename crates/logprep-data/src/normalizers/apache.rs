use logprep_core::models::columns::*;
use logprep_core::models::{Source, Table, UnifiedLogRecord};
use logprep_core::time_utils::{
    format_timestamp, parse_free_form, parse_with_format, APACHE_FORMAT,
};

use super::{cell_text, Normalizer};

/// Output columns of [`ApacheNormalizer`].
pub const APACHE_COLUMNS: &[&str] = &[
    TIMESTAMP,
    SOURCE,
    IP,
    EVENT_TYPE,
    LEVEL,
    RAW_MESSAGE,
    EVENT_TEMPLATE,
    IS_LOGIN_ATTEMPT,
    IS_SUCCESS,
];

/// Normalizes the structured Apache log (`Time, Level, Content, EventId[,
/// EventTemplate]`).
///
/// Apache lines carry no client address and are never login attempts, so
/// `ip` and `is_success` stay null and `is_login_attempt` is always 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApacheNormalizer;

impl ApacheNormalizer {
    /// Strict `"Sun Dec 04 04:47:44 2005"` layout first, then free-form.
    pub fn parse_time(raw: &str) -> Option<String> {
        parse_with_format(raw, APACHE_FORMAT)
            .or_else(|| parse_free_form(raw))
            .map(|dt| format_timestamp(&dt))
    }
}

impl Normalizer for ApacheNormalizer {
    fn source(&self) -> Source {
        Source::Apache
    }

    fn keep_columns(&self) -> &'static [&'static str] {
        APACHE_COLUMNS
    }

    fn normalize_records(&self, table: &Table) -> Vec<UnifiedLogRecord> {
        (0..table.len())
            .map(|row| {
                let mut record = UnifiedLogRecord::new(Source::Apache);
                record.timestamp =
                    cell_text(table, row, "Time").and_then(|t| Self::parse_time(&t));
                record.level = cell_text(table, row, "Level").map(|l| l.trim().to_lowercase());
                record.raw_message = cell_text(table, row, "Content");
                record.event_type = cell_text(table, row, "EventId");
                record.event_template =
                    Some(cell_text(table, row, "EventTemplate").unwrap_or_default());
                record
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logprep_core::models::Cell;

    fn apache_table(rows: &[[&str; 5]]) -> Table {
        let mut t = Table::with_columns(&["Time", "Level", "Content", "EventId", "EventTemplate"]);
        for r in rows {
            t.push_row(
                r.iter()
                    .map(|v| if v.is_empty() { Cell::Null } else { Cell::text(*v) })
                    .collect(),
            );
        }
        t
    }

    #[test]
    fn test_parse_time_strict() {
        assert_eq!(
            ApacheNormalizer::parse_time("Sun Dec 04 04:47:44 2005"),
            Some("2005-12-04 04:47:44".to_string())
        );
    }

    #[test]
    fn test_parse_time_falls_back_to_free_form() {
        assert_eq!(
            ApacheNormalizer::parse_time("2005-12-04T04:47:44"),
            Some("2005-12-04 04:47:44".to_string())
        );
        assert_eq!(ApacheNormalizer::parse_time("garbage"), None);
    }

    #[test]
    fn test_normalize_exact_columns() {
        let table = apache_table(&[["Sun Dec 04 04:47:44 2005", "notice", "msg", "E2", "t"]]);
        let out = ApacheNormalizer.normalize(&table);
        assert_eq!(out.columns(), APACHE_COLUMNS);
    }

    #[test]
    fn test_normalize_row_values() {
        let table = apache_table(&[[
            "Sun Dec 04 04:47:44 2005",
            "  NOTICE ",
            "workerEnv.init() ok /etc/httpd/conf/workers2.properties",
            "E2",
            "workerEnv.init() ok <*>",
        ]]);
        let out = ApacheNormalizer.normalize(&table);

        assert_eq!(out.cell(0, TIMESTAMP), Some(&Cell::text("2005-12-04 04:47:44")));
        assert_eq!(out.cell(0, SOURCE), Some(&Cell::text("apache")));
        assert_eq!(out.cell(0, IP), Some(&Cell::Null));
        assert_eq!(out.cell(0, EVENT_TYPE), Some(&Cell::text("E2")));
        assert_eq!(out.cell(0, LEVEL), Some(&Cell::text("notice")));
        assert_eq!(out.cell(0, EVENT_TEMPLATE), Some(&Cell::text("workerEnv.init() ok <*>")));
        assert_eq!(out.cell(0, IS_LOGIN_ATTEMPT), Some(&Cell::Int(0)));
        assert_eq!(out.cell(0, IS_SUCCESS), Some(&Cell::Null));
    }

    #[test]
    fn test_normalize_without_template_column() {
        let mut table = Table::with_columns(&["Time", "Level", "Content", "EventId"]);
        table.push_row(vec![
            Cell::text("bad time"),
            Cell::text("error"),
            Cell::text("mod_jk child init 1 -2"),
            Cell::text("E5"),
        ]);
        let out = ApacheNormalizer.normalize(&table);

        assert_eq!(out.cell(0, TIMESTAMP), Some(&Cell::Null));
        assert_eq!(out.cell(0, EVENT_TEMPLATE), Some(&Cell::text("")));
        assert_eq!(out.cell(0, RAW_MESSAGE), Some(&Cell::text("mod_jk child init 1 -2")));
    }

    #[test]
    fn test_normalize_preserves_row_order() {
        let table = apache_table(&[
            ["Sun Dec 04 04:47:44 2005", "notice", "a", "E1", ""],
            ["Sun Dec 04 04:51:08 2005", "error", "b", "E2", ""],
        ]);
        let out = ApacheNormalizer.normalize(&table);
        assert_eq!(out.len(), 2);
        assert_eq!(out.cell(1, RAW_MESSAGE), Some(&Cell::text("b")));
        assert_eq!(out.cell(1, TIMESTAMP), Some(&Cell::text("2005-12-04 04:51:08")));
    }
}
