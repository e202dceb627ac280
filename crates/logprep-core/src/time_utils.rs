//! Timestamp parsing and formatting shared by the normalizers.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Weekday};
use tracing::debug;

/// Output format of every normalized `timestamp` cell.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Apache structured-log time, e.g. `"Sun Dec 04 04:47:44 2005"`.
pub const APACHE_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// SSH time after the year has been spliced in, e.g. `"Dec 10 2024 06:55:46"`.
pub const SSH_FORMAT: &str = "%b %d %Y %H:%M:%S";

/// Naive date-time patterns tried by [`parse_free_form`], in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    APACHE_FORMAT,
    SSH_FORMAT,
    "%b %d %H:%M:%S %Y",
    "%d %b %Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Patterns carrying a numeric UTC offset.
const OFFSET_FORMATS: &[&str] = &["%d/%b/%Y:%H:%M:%S %z", "%Y-%m-%d %H:%M:%S %z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d %Y"];

/// Render a date-time in [`OUTPUT_FORMAT`].
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(OUTPUT_FORMAT).to_string()
}

/// Parse `s` with exactly one strftime pattern.
pub fn parse_with_format(s: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), fmt).ok()
}

/// Best-effort parse of a date-time string in any of the common layouts.
///
/// Values carrying an offset keep the wall-clock time as written. A leading
/// weekday token that disagrees with the date is dropped and parsing retried.
/// Time-only strings are rejected: they name no date and would otherwise
/// depend on the day the run happens.
pub fn parse_free_form(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(dt) = parse_known_layouts(s) {
        return Some(dt);
    }

    if let Some((first, rest)) = s.split_once(char::is_whitespace) {
        let first = first.trim_end_matches(',');
        if first.parse::<Weekday>().is_ok() {
            if let Some(dt) = parse_known_layouts(rest.trim_start()) {
                return Some(dt);
            }
        }
    }

    debug!("could not parse timestamp \"{}\"", s);
    None
}

fn parse_known_layouts(s: &str) -> Option<NaiveDateTime> {
    let normalised = match s.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(dt.naive_local());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.naive_local());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Build a full date-time from SSH's split `Date`/`Day`/`Time` columns and an
/// explicit year.
///
/// `day` may be written as an integer or an integral float (`"4"`, `"04"`,
/// `"4.0"`).
pub fn parse_month_day_time(
    month: &str,
    day: &str,
    year: i32,
    time: &str,
) -> Option<NaiveDateTime> {
    let day = day.trim().parse::<f64>().ok()?;
    if day.fract() != 0.0 || !(1.0..=31.0).contains(&day) {
        return None;
    }
    let candidate = format!(
        "{} {:02} {} {}",
        month.trim(),
        day as u32,
        year,
        time.trim()
    );
    parse_with_format(&candidate, SSH_FORMAT)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(dt: Option<NaiveDateTime>) -> Option<String> {
        dt.map(|d| format_timestamp(&d))
    }

    // ── parse_with_format ─────────────────────────────────────────────────────

    #[test]
    fn test_apache_strict_format() {
        let dt = parse_with_format("Sun Dec 04 04:47:44 2005", APACHE_FORMAT);
        assert_eq!(fmt(dt), Some("2005-12-04 04:47:44".to_string()));
    }

    #[test]
    fn test_apache_strict_format_rejects_wrong_weekday() {
        assert!(parse_with_format("Mon Dec 04 04:47:44 2005", APACHE_FORMAT).is_none());
    }

    // ── parse_free_form ───────────────────────────────────────────────────────

    #[test]
    fn test_free_form_iso_variants() {
        assert_eq!(
            fmt(parse_free_form("2024-01-15T10:30:00")),
            Some("2024-01-15 10:30:00".to_string())
        );
        assert_eq!(
            fmt(parse_free_form("2024-01-15 10:30:00.250")),
            Some("2024-01-15 10:30:00".to_string())
        );
        assert_eq!(
            fmt(parse_free_form("2024-01-15")),
            Some("2024-01-15 00:00:00".to_string())
        );
    }

    #[test]
    fn test_free_form_offset_keeps_wall_clock() {
        assert_eq!(
            fmt(parse_free_form("2024-01-15T10:30:00+05:00")),
            Some("2024-01-15 10:30:00".to_string())
        );
        assert_eq!(
            fmt(parse_free_form("2024-01-15T10:30:00Z")),
            Some("2024-01-15 10:30:00".to_string())
        );
        assert_eq!(
            fmt(parse_free_form("04/Dec/2005:04:47:44 -0800")),
            Some("2005-12-04 04:47:44".to_string())
        );
    }

    #[test]
    fn test_free_form_drops_inconsistent_weekday() {
        assert_eq!(
            fmt(parse_free_form("Mon Dec 04 04:47:44 2005")),
            Some("2005-12-04 04:47:44".to_string())
        );
    }

    #[test]
    fn test_free_form_rejects_time_only_and_garbage() {
        assert!(parse_free_form("06:55:46").is_none());
        assert!(parse_free_form("not a date").is_none());
        assert!(parse_free_form("   ").is_none());
    }

    // ── parse_month_day_time ──────────────────────────────────────────────────

    #[test]
    fn test_month_day_time_with_explicit_year() {
        let dt = parse_month_day_time("Dec", "10", 2017, "06:55:46");
        assert_eq!(fmt(dt), Some("2017-12-10 06:55:46".to_string()));
    }

    #[test]
    fn test_month_day_time_pads_single_digit_day() {
        let dt = parse_month_day_time("Jan", "4.0", 2020, "00:00:01");
        assert_eq!(fmt(dt), Some("2020-01-04 00:00:01".to_string()));
    }

    #[test]
    fn test_month_day_time_invalid_inputs() {
        assert!(parse_month_day_time("Dec", "x", 2017, "06:55:46").is_none());
        assert!(parse_month_day_time("Dec", "4.5", 2017, "06:55:46").is_none());
        assert!(parse_month_day_time("Feb", "30", 2017, "06:55:46").is_none());
        assert!(parse_month_day_time("Foo", "10", 2017, "06:55:46").is_none());
    }
}
