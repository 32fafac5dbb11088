//! TableSink trait: the text-table output boundary
//!
//! The formatter decides what goes into each table; a sink decides how it
//! looks on the page:
//! - `DeckWriter`: in-memory column-aligned deck text
//! - Other sinks (spreadsheets, UI tables) can implement this trait
//!
//! Calls arrive in a fixed sequence per table: `keyword`, then one or more
//! groups of `header` followed by rows (`add` ... `row_completed`), with
//! `comment` allowed between rows, and finally `table_completed`.

/// A single cell value handed to a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Let the simulator pick its default
    Default,
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Text(value.to_string()), Self::Integer)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Numeric rendering hint for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatFormat {
    /// Fixed number of decimals
    Fixed(usize),
    /// Up to this many decimals, trailing zeros trimmed
    Concise(usize),
}

/// Column title plus an optional numeric precision hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub format: Option<FloatFormat>,
}

impl Column {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            format: None,
        }
    }

    pub fn with_format(title: impl Into<String>, format: FloatFormat) -> Self {
        Self {
            title: title.into(),
            format: Some(format),
        }
    }
}

/// Receiver of keyword tables.
pub trait TableSink {
    /// Start a keyword table
    fn keyword(&mut self, name: &str);

    /// Free-text comment line
    fn comment(&mut self, text: &str);

    /// Start a column group; following rows use these columns
    fn header(&mut self, columns: &[Column]);

    /// Append one cell to the current row
    fn add(&mut self, value: CellValue);

    /// Append an optional number; unset and non-finite values become defaults
    fn add_optional(&mut self, value: Option<f64>) {
        match value.filter(|v| v.is_finite()) {
            Some(v) => self.add(CellValue::Float(v)),
            None => self.add(CellValue::Default),
        }
    }

    fn row_completed(&mut self);

    fn table_completed(&mut self);
}
