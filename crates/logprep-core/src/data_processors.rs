use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Cell, Numeric};

// ── IpExtractor ───────────────────────────────────────────────────────────────

/// Dotted quad with every octet in 0–255.
const IPV4_PATTERN: &str =
    r"(?:(?:25[0-5]|2[0-4][0-9]|1?[0-9]{1,2})\.){3}(?:25[0-5]|2[0-4][0-9]|1?[0-9]{1,2})";

/// Pulls IPv4 addresses out of free-text log messages.
pub struct IpExtractor;

impl IpExtractor {
    fn regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(IPV4_PATTERN).expect("regex is valid"))
    }

    /// First IPv4 address in `text`, or `None`.
    ///
    /// A candidate touching another digit on either side is part of a longer
    /// number and is skipped, so `999.1.1.1` yields nothing instead of
    /// `99.1.1.1`. Letters and punctuation may touch the address.
    pub fn extract(text: &str) -> Option<String> {
        let bytes = text.as_bytes();
        let mut start = 0;
        while let Some(m) = Self::regex().find_at(text, start) {
            let digit_before = m.start() > 0 && bytes[m.start() - 1].is_ascii_digit();
            let digit_after = bytes.get(m.end()).is_some_and(u8::is_ascii_digit);
            if !digit_before && !digit_after {
                return Some(m.as_str().to_string());
            }
            // Matches start on an ASCII digit, so the next byte is a char boundary.
            start = m.start() + 1;
        }
        None
    }
}

// ── Keyword rules ─────────────────────────────────────────────────────────────

/// A single substring predicate over a lower-cased log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    /// Short identifier used in logs and tests.
    pub name: &'static str,
    /// Lower-case substring that triggers the rule.
    pub needle: &'static str,
}

/// An ordered list of [`KeywordRule`]s. A message matches the set when any
/// rule matches; the first matching rule is reported.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRuleSet {
    /// Identifier used in log lines.
    pub name: &'static str,
    pub rules: &'static [KeywordRule],
}

impl KeywordRuleSet {
    /// First rule whose needle occurs in `lowered`.
    ///
    /// `lowered` must already be lower-cased; use [`KeywordRuleSet::flag`]
    /// for raw text.
    pub fn first_match(&self, lowered: &str) -> Option<&'static KeywordRule> {
        self.rules.iter().find(|rule| lowered.contains(rule.needle))
    }

    /// `1` when any rule matches the lower-cased `lowered`, else `0`.
    pub fn flag_lowered(&self, lowered: &str) -> u8 {
        u8::from(self.first_match(lowered).is_some())
    }

    /// Case-insensitive variant of [`KeywordRuleSet::flag_lowered`].
    pub fn flag(&self, text: &str) -> u8 {
        self.flag_lowered(&text.to_lowercase())
    }
}

/// SSH lines that represent an authentication attempt.
pub const LOGIN_ATTEMPT_RULES: KeywordRuleSet = KeywordRuleSet {
    name: "login_attempt",
    rules: &[
        KeywordRule {
            name: "invalid_user",
            needle: "invalid user",
        },
        KeywordRule {
            name: "failed_password",
            needle: "failed password",
        },
        KeywordRule {
            name: "userauth_request",
            needle: "input_userauth_request",
        },
    ],
};

/// SSH lines that represent a successful login.
pub const LOGIN_SUCCESS_RULES: KeywordRuleSet = KeywordRuleSet {
    name: "login_success",
    rules: &[
        KeywordRule {
            name: "accepted_password",
            needle: "accepted password",
        },
        KeywordRule {
            name: "accepted_publickey",
            needle: "accepted publickey",
        },
    ],
};

// ── NumericCoercer ────────────────────────────────────────────────────────────

/// Outcome of coercing a whole column to numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnCoercion {
    /// Every non-null cell parsed. Null cells stay `None`.
    Numeric(Vec<Option<Numeric>>),
    /// At least one non-null cell is not a number; the column is left as is.
    NotNumeric { first_bad_row: usize },
}

impl ColumnCoercion {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnCoercion::Numeric(_))
    }
}

/// Explicit number conversion for table cells.
pub struct NumericCoercer;

impl NumericCoercer {
    /// Coerce every cell of a column, all or nothing.
    pub fn coerce_column<'a, I>(cells: I) -> ColumnCoercion
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let mut values = Vec::new();
        for (row, cell) in cells.into_iter().enumerate() {
            if cell.is_null() {
                values.push(None);
                continue;
            }
            match cell.as_numeric() {
                Some(n) => values.push(Some(n)),
                None => return ColumnCoercion::NotNumeric { first_bad_row: row },
            }
        }
        ColumnCoercion::Numeric(values)
    }

    /// Numeric value of `cell`, with null and unparseable cells read as `0`.
    pub fn coerce_or_zero(cell: &Cell) -> Numeric {
        cell.as_numeric().unwrap_or(Numeric::Int(0))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
