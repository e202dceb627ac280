use logprep_core::data_processors::{IpExtractor, LOGIN_ATTEMPT_RULES, LOGIN_SUCCESS_RULES};
use logprep_core::models::columns::*;
use logprep_core::models::{Source, Table, UnifiedLogRecord};
use logprep_core::time_utils::{format_timestamp, parse_free_form, parse_month_day_time};
use tracing::debug;

use super::{cell_text, Normalizer};

/// Output columns of [`SshNormalizer`].
pub const SSH_COLUMNS: &[&str] = &[
    TIMESTAMP,
    SOURCE,
    IP,
    COMPONENT,
    PID,
    EVENT_TYPE,
    EVENT_TEMPLATE,
    RAW_MESSAGE,
    IS_LOGIN_ATTEMPT,
    IS_SUCCESS,
];

/// Normalizes the structured OpenSSH log (`Date, Day, Time, Component, Pid,
/// Content[, EventId, EventTemplate]`).
///
/// syslog lines carry no year. The normalizer splices `reference_year` into
/// every timestamp, so replaying archived logs needs the year they were
/// written in.
#[derive(Debug, Clone, Copy)]
pub struct SshNormalizer {
    reference_year: i32,
}

impl SshNormalizer {
    pub fn new(reference_year: i32) -> Self {
        Self { reference_year }
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// `"<Date> <Day> <year> <Time>"`, falling back to `Time` alone.
    pub fn build_timestamp(
        &self,
        month: Option<&str>,
        day: Option<&str>,
        time: Option<&str>,
    ) -> Option<String> {
        let spliced = match (month, day, time) {
            (Some(m), Some(d), Some(t)) => parse_month_day_time(m, d, self.reference_year, t),
            _ => None,
        };
        spliced
            .or_else(|| time.and_then(parse_free_form))
            .map(|dt| format_timestamp(&dt))
    }
}

impl Normalizer for SshNormalizer {
    fn source(&self) -> Source {
        Source::Ssh
    }

    fn keep_columns(&self) -> &'static [&'static str] {
        SSH_COLUMNS
    }

    fn normalize_records(&self, table: &Table) -> Vec<UnifiedLogRecord> {
        let records: Vec<UnifiedLogRecord> = (0..table.len())
            .map(|row| {
                let month = cell_text(table, row, "Date");
                let day = cell_text(table, row, "Day");
                let time = cell_text(table, row, "Time");
                let message = cell_text(table, row, "Content");
                let lowered = message.as_deref().unwrap_or_default().to_lowercase();

                let mut record = UnifiedLogRecord::new(Source::Ssh);
                record.timestamp =
                    self.build_timestamp(month.as_deref(), day.as_deref(), time.as_deref());
                record.component = cell_text(table, row, "Component");
                record.pid = cell_text(table, row, "Pid");
                record.ip = message.as_deref().and_then(IpExtractor::extract);
                record.is_login_attempt = LOGIN_ATTEMPT_RULES.flag_lowered(&lowered);
                record.is_success = Some(LOGIN_SUCCESS_RULES.flag_lowered(&lowered));
                record.event_type = Some(cell_text(table, row, "EventId").unwrap_or_default());
                record.event_template =
                    Some(cell_text(table, row, "EventTemplate").unwrap_or_default());
                record.raw_message = message;
                record
            })
            .collect();

        let attempts = records.iter().filter(|r| r.is_login_attempt == 1).count();
        let successes = records.iter().filter(|r| r.is_success == Some(1)).count();
        debug!(
            "ssh: {} rows match {}, {} rows match {}",
            attempts, LOGIN_ATTEMPT_RULES.name, successes, LOGIN_SUCCESS_RULES.name
        );

        records
    }
}
