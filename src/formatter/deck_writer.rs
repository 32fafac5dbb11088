//! DeckWriter: column-aligned simulator deck text
//!
//! Layout of one keyword table:
//!
//! ```text
//! WELSEGS
//! -- Name Dep 1   Tlen 1  Vol 1 Len&Dep PresDrop
//!    W1   1100.00 1200.00 1*    ABS     HF-      /
//! -- First Seg Last Seg ...
//!    2         2        ...                       /
//! /
//!
//! ```
//!
//! Rows are buffered per header group so every column can be padded to the
//! widest of its title and cells.

use tracing::warn;

use super::sink::{CellValue, Column, FloatFormat, TableSink};
use crate::config::defaults::{DEFAULT_FLOAT_PRECISION, DEFAULT_MARKER};

const HEADER_PREFIX: &str = "-- ";
const ROW_PREFIX: &str = "   ";
const ROW_TERMINATOR: &str = " /";
const TABLE_TERMINATOR: &str = "/";

enum Pending {
    Comment(String),
    Row(Vec<String>),
}

/// In-memory [`TableSink`] producing deck text.
pub struct DeckWriter {
    out: String,
    default_marker: String,
    float_precision: usize,

    columns: Vec<Column>,
    pending: Vec<Pending>,
    current_row: Vec<String>,
}

impl DeckWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            default_marker: DEFAULT_MARKER.to_string(),
            float_precision: DEFAULT_FLOAT_PRECISION,
            columns: Vec::new(),
            pending: Vec::new(),
            current_row: Vec::new(),
        }
    }

    pub fn with_default_marker(mut self, marker: impl Into<String>) -> Self {
        self.default_marker = marker.into();
        self
    }

    pub const fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = precision;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Finished text. Any table left open is closed first.
    pub fn into_string(mut self) -> String {
        if !self.columns.is_empty() || !self.pending.is_empty() || !self.current_row.is_empty() {
            warn!("Deck writer dropped with an open table; closing it");
            self.table_completed();
        }
        self.out
    }

    fn render(&self, value: &CellValue) -> String {
        match value {
            CellValue::Integer(v) => v.to_string(),
            CellValue::Float(v) if !v.is_finite() => self.default_marker.clone(),
            CellValue::Float(v) => {
                let format = self
                    .columns
                    .get(self.current_row.len())
                    .and_then(|c| c.format)
                    .unwrap_or(FloatFormat::Fixed(self.float_precision));
                format_float(*v, format)
            }
            CellValue::Text(text) => quote_text(text),
            CellValue::Default => self.default_marker.clone(),
        }
    }

    /// Write the buffered header group with padded columns.
    fn flush_group(&mut self) {
        if self.columns.is_empty() && self.pending.is_empty() {
            return;
        }

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.title.len()).collect();
        for pending in &self.pending {
            if let Pending::Row(cells) = pending {
                for (i, cell) in cells.iter().enumerate() {
                    if i < widths.len() {
                        widths[i] = widths[i].max(cell.len());
                    } else {
                        widths.push(cell.len());
                    }
                }
            }
        }

        if !self.columns.is_empty() {
            let titles: Vec<&str> = self.columns.iter().map(|c| c.title.as_str()).collect();
            push_line(&mut self.out, HEADER_PREFIX, &titles, &widths, "");
        }

        for pending in std::mem::take(&mut self.pending) {
            match pending {
                Pending::Comment(text) => {
                    self.out.push_str(HEADER_PREFIX.trim_end());
                    if !text.is_empty() {
                        self.out.push(' ');
                        self.out.push_str(&text);
                    }
                    self.out.push('\n');
                }
                Pending::Row(cells) => {
                    let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
                    push_line(&mut self.out, ROW_PREFIX, &cells, &widths, ROW_TERMINATOR);
                }
            }
        }

        self.columns.clear();
    }
}

impl Default for DeckWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSink for DeckWriter {
    fn keyword(&mut self, name: &str) {
        self.out.push_str(name);
        self.out.push('\n');
    }

    /// One comment line per line of `text`, so embedded line breaks stay commented.
    fn comment(&mut self, text: &str) {
        let lines: Vec<&str> = text.split(['\r', '\n']).filter(|l| !l.is_empty()).collect();
        if lines.is_empty() {
            self.pending.push(Pending::Comment(String::new()));
            return;
        }
        for line in lines {
            self.pending.push(Pending::Comment(line.to_string()));
        }
    }

    fn header(&mut self, columns: &[Column]) {
        self.flush_group();
        self.columns = columns.to_vec();
    }

    fn add(&mut self, value: CellValue) {
        let cell = self.render(&value);
        self.current_row.push(cell);
    }

    fn row_completed(&mut self) {
        let row = std::mem::take(&mut self.current_row);
        self.pending.push(Pending::Row(row));
    }

    fn table_completed(&mut self) {
        if !self.current_row.is_empty() {
            self.row_completed();
        }
        self.flush_group();
        self.out.push_str(TABLE_TERMINATOR);
        self.out.push_str("\n\n");
    }
}

fn push_line(out: &mut String, prefix: &str, cells: &[&str], widths: &[usize], terminator: &str) {
    let mut line = String::from(prefix);
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let width = widths.get(i).copied().unwrap_or(0);
        line.push_str(&format!("{cell:<width$}"));
    }
    out.push_str(line.trim_end());
    out.push_str(terminator);
    out.push('\n');
}

fn format_float(value: f64, format: FloatFormat) -> String {
    match format {
        FloatFormat::Fixed(precision) => format!("{value:.precision$}"),
        FloatFormat::Concise(precision) => {
            let fixed = format!("{value:.precision$}");
            if fixed.contains('.') {
                fixed.trim_end_matches('0').trim_end_matches('.').to_string()
            } else {
                fixed
            }
        }
    }
}

fn quote_text(text: &str) -> String {
    if text.is_empty() || text.contains('/') || text.chars().any(char::is_whitespace) {
        format!("'{text}'")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        let mut writer = DeckWriter::new();
        writer.keyword("WSEGVALV");
        writer.header(&[Column::new("Name")]);
        writer.add("W1".into());
        writer.row_completed();
        writer.header(&[Column::new("Seg No"), Column::new("Cv")]);
        writer.add(12_i32.into());
        writer.add(CellValue::Float(0.5));
        writer.row_completed();
        writer.table_completed();

        let text = writer.into_string();
        assert_eq!(
            text,
            "WSEGVALV\n-- Name\n   W1 /\n-- Seg No Cv\n   12     0.50 /\n/\n\n"
        );
    }

    #[test]
    fn test_unset_values_render_marker() {
        let mut writer = DeckWriter::new().with_default_marker("1*");
        writer.header(&[Column::new("A"), Column::new("B"), Column::new("C")]);
        writer.add_optional(None);
        writer.add(CellValue::Float(f64::INFINITY));
        writer.add(CellValue::Default);
        writer.row_completed();
        writer.table_completed();

        assert!(writer.as_str().contains("   1* 1* 1* /"));
    }

    #[test]
    fn test_column_precision_hints() {
        assert_eq!(format_float(0.15, FloatFormat::Fixed(2)), "0.15");
        assert_eq!(format_float(1.0e-5, FloatFormat::Fixed(7)), "0.0000100");
        assert_eq!(format_float(2.5, FloatFormat::Concise(4)), "2.5");
        assert_eq!(format_float(3.0, FloatFormat::Concise(4)), "3");
        assert_eq!(format_float(3.0, FloatFormat::Concise(0)), "3");
    }

    #[test]
    fn test_text_quoting() {
        assert_eq!(quote_text("W1"), "W1");
        assert_eq!(quote_text("WELL A"), "'WELL A'");
        assert_eq!(quote_text("A/B"), "'A/B'");
        assert_eq!(quote_text(""), "''");
    }

    #[test]
    fn test_comments_kept_between_rows() {
        let mut writer = DeckWriter::new();
        writer.header(&[Column::new("Seg")]);
        writer.comment("Main bore");
        writer.add(1_i32.into());
        writer.row_completed();
        writer.table_completed();

        assert_eq!(writer.as_str(), "-- Seg\n-- Main bore\n   1 /\n/\n\n");
    }

    #[test]
    fn test_multiline_comment_stays_commented() {
        let mut writer = DeckWriter::new();
        writer.header(&[Column::new("Seg")]);
        writer.comment("heel\n2 2 2 /\r\ntoe");
        writer.comment("");
        writer.add(1_i32.into());
        writer.row_completed();
        writer.table_completed();

        assert_eq!(
            writer.as_str(),
            "-- Seg\n-- heel\n-- 2 2 2 /\n-- toe\n--\n   1 /\n/\n\n"
        );
        assert!(writer
            .as_str()
            .lines()
            .all(|l| l.starts_with("--") || l.starts_with(ROW_PREFIX) || l == "/" || l.is_empty()));
    }

    #[test]
    fn test_float_precision_override() {
        let mut writer = DeckWriter::new().with_float_precision(3);
        writer.header(&[Column::new("L")]);
        writer.add(CellValue::Float(10.0));
        writer.row_completed();
        writer.table_completed();
        assert!(writer.as_str().contains("10.000 /"));
    }
}
