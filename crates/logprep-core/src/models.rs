use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Column names of the unified schema.
pub mod columns {
    pub const TIMESTAMP: &str = "timestamp";
    pub const SOURCE: &str = "source";
    pub const IP: &str = "ip";
    pub const EVENT_TYPE: &str = "event_type";
    pub const LEVEL: &str = "level";
    pub const COMPONENT: &str = "component";
    pub const PID: &str = "pid";
    pub const RAW_MESSAGE: &str = "raw_message";
    pub const EVENT_TEMPLATE: &str = "event_template";
    pub const IS_LOGIN_ATTEMPT: &str = "is_login_attempt";
    pub const IS_SUCCESS: &str = "is_success";
    pub const TOTAL_BYTES: &str = "total_bytes";
    pub const TOTAL_PACKETS: &str = "total_packets";
    pub const LABEL: &str = "label";
}

/// The log family a unified record was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Web-server log parsed into structured columns.
    Apache,
    /// OpenSSH authentication log.
    Ssh,
    /// UNSW-NB15 network-flow feature set.
    Unsw,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Apache => "apache",
            Source::Ssh => "ssh",
            Source::Unsw => "unsw",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Numeric ───────────────────────────────────────────────────────────────────

/// A number obtained by explicit coercion of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Parse trimmed text as an integer, then as a finite float.
    ///
    /// Returns `None` for empty text, non-numeric text, `NaN` and infinities.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Some(Numeric::Int(i));
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(Numeric::Float(f)),
            _ => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    /// Integer part of the value (towards zero).
    pub fn truncate(self) -> i64 {
        match self {
            Numeric::Int(i) => i,
            Numeric::Float(f) => f.trunc() as i64,
        }
    }
}

impl Add for Numeric {
    type Output = Numeric;

    fn add(self, rhs: Numeric) -> Numeric {
        match (self, rhs) {
            (Numeric::Int(a), Numeric::Int(b)) => match a.checked_add(b) {
                Some(sum) => Numeric::Int(sum),
                None => Numeric::Float(a as f64 + b as f64),
            },
            (Numeric::Int(a), Numeric::Float(b)) => Numeric::Float(a as f64 + b),
            (Numeric::Float(a), Numeric::Int(b)) => Numeric::Float(a + b as f64),
            (Numeric::Float(a), Numeric::Float(b)) => Numeric::Float(a + b),
        }
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// A single table value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Null,
    Text(String),
    Int(i64),
    Float(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Render the cell as text; `None` for null.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Numeric view of the cell. Text is parsed with [`Numeric::parse`].
    pub fn as_numeric(&self) -> Option<Numeric> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => Numeric::parse(s),
            Cell::Int(i) => Some(Numeric::Int(*i)),
            Cell::Float(f) if f.is_finite() => Some(Numeric::Float(*f)),
            Cell::Float(_) => None,
        }
    }
}

impl From<Numeric> for Cell {
    fn from(n: Numeric) -> Self {
        match n {
            Numeric::Int(i) => Cell::Int(i),
            Numeric::Float(f) => Cell::Float(f),
        }
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::Text).unwrap_or(Cell::Null)
    }
}

impl From<Option<i64>> for Cell {
    fn from(value: Option<i64>) -> Self {
        value.map(Cell::Int).unwrap_or(Cell::Null)
    }
}

impl fmt::Display for Cell {
    /// CSV rendering: null is an empty field, integral floats keep a `.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    write!(f, "{:.1}", v)
                } else {
                    write!(f, "{}", v)
                }
            }
        }
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// An in-memory table: ordered column names plus rows of cells.
///
/// Every row has exactly `columns().len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_columns(columns: &[&str]) -> Self {
        Self::new(columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row, padding with nulls or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    /// Cell at `row` in column `name`; `None` when either does not exist.
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All cells of column `name` in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Replace the values of an existing column. Returns `false` when the
    /// column is unknown or `cells` has the wrong length.
    pub fn replace_column(&mut self, name: &str, cells: Vec<Cell>) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        if cells.len() != self.rows.len() {
            return false;
        }
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row[idx] = cell;
        }
        true
    }

    /// Project the table onto `columns`, in that order. Columns this table
    /// lacks are filled with nulls.
    pub fn reindex(&self, columns: &[String]) -> Table {
        let mapping: Vec<Option<usize>> =
            columns.iter().map(|c| self.column_index(c)).collect();

        let rows = self
            .rows
            .iter()
            .map(|row| {
                mapping
                    .iter()
                    .map(|idx| idx.map(|i| row[i].clone()).unwrap_or_default())
                    .collect()
            })
            .collect();

        Table {
            columns: columns.to_vec(),
            rows,
        }
    }

    /// Append every row of `other`, aligned by column name.
    pub fn append(&mut self, other: &Table) {
        let aligned = if other.columns == self.columns {
            other.rows.clone()
        } else {
            other.reindex(&self.columns).rows
        };
        self.rows.extend(aligned);
    }
}

// ── UnifiedLogRecord ──────────────────────────────────────────────────────────

/// One normalized record in the shared schema.
///
/// Fields a source has no concept of stay `None`; only the columns a
/// normalizer declares are emitted into its output table.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedLogRecord {
    /// `YYYY-MM-DD HH:MM:SS`, or `None` when unparseable.
    pub timestamp: Option<String>,
    pub source: Source,
    pub ip: Option<String>,
    pub event_type: Option<String>,
    pub level: Option<String>,
    pub component: Option<String>,
    pub pid: Option<String>,
    pub raw_message: Option<String>,
    pub event_template: Option<String>,
    pub is_login_attempt: u8,
    pub is_success: Option<u8>,
    pub total_bytes: Option<Numeric>,
    pub total_packets: Option<Numeric>,
    /// 0 = benign, 1 = malicious.
    pub label: Option<i64>,
}

impl UnifiedLogRecord {
    pub fn new(source: Source) -> Self {
        Self {
            timestamp: None,
            source,
            ip: None,
            event_type: None,
            level: None,
            component: None,
            pid: None,
            raw_message: None,
            event_template: None,
            is_login_attempt: 0,
            is_success: None,
            total_bytes: None,
            total_packets: None,
            label: None,
        }
    }

    /// Value of the unified column `name`. Unknown columns are null.
    pub fn field(&self, name: &str) -> Cell {
        match name {
            columns::TIMESTAMP => self.timestamp.clone().into(),
            columns::SOURCE => Cell::text(self.source.as_str()),
            columns::IP => self.ip.clone().into(),
            columns::EVENT_TYPE => self.event_type.clone().into(),
            columns::LEVEL => self.level.clone().into(),
            columns::COMPONENT => self.component.clone().into(),
            columns::PID => self.pid.clone().into(),
            columns::RAW_MESSAGE => self.raw_message.clone().into(),
            columns::EVENT_TEMPLATE => self.event_template.clone().into(),
            columns::IS_LOGIN_ATTEMPT => Cell::Int(i64::from(self.is_login_attempt)),
            columns::IS_SUCCESS => self.is_success.map(i64::from).into(),
            columns::TOTAL_BYTES => self.total_bytes.map(Cell::from).unwrap_or_default(),
            columns::TOTAL_PACKETS => self.total_packets.map(Cell::from).unwrap_or_default(),
            columns::LABEL => self.label.into(),
            _ => Cell::Null,
        }
    }
}

/// Build a table holding exactly `keep` columns from `records`.
pub fn records_to_table(records: &[UnifiedLogRecord], keep: &[&str]) -> Table {
    let mut table = Table::with_columns(keep);
    for record in records {
        table.push_row(keep.iter().map(|c| record.field(c)).collect());
    }
    table
}
