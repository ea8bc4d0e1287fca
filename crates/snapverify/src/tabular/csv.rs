//! Line-oriented CSV reader.
//!
//! The first non-empty line is the header. Quoted fields may contain the
//! delimiter but not line breaks.

use super::{check_unique_headers, DataRow};
use crate::result::{VerifyError, VerifyResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

const BOM: char = '\u{feff}';

/// How `"` is treated inside a field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteMode {
    /// Every quote toggles the quoted state and is dropped
    #[default]
    Toggle,
    /// Like `Toggle`, but `""` inside a quoted field is a literal quote
    Escaped,
}

/// CSV parsing options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    /// Field separator
    pub delimiter: char,
    /// Quote handling
    pub quotes: QuoteMode,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quotes: QuoteMode::Toggle,
        }
    }
}

impl CsvOptions {
    /// Create default options (comma, toggling quotes)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote mode
    #[must_use]
    pub const fn with_quotes(mut self, quotes: QuoteMode) -> Self {
        self.quotes = quotes;
        self
    }
}

/// Read a CSV file into rows
///
/// # Errors
///
/// Returns error if the file cannot be read or its header is missing,
/// blank or repeats a column
pub fn read_csv(path: impl AsRef<Path>, options: &CsvOptions) -> VerifyResult<Vec<DataRow>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| VerifyError::parse(format!("cannot read {}: {e}", path.display())))?;
    let rows = parse_csv(&text, options)?;
    debug!(file = %path.display(), rows = rows.len(), "loaded csv");
    Ok(rows)
}

/// Parse CSV text into rows
///
/// # Errors
///
/// Returns error if the header is missing, blank or repeats a column
pub fn parse_csv(text: &str, options: &CsvOptions) -> VerifyResult<Vec<DataRow>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut lines = text.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| VerifyError::parse("CSV input is empty"))?;
    if header_line.trim().is_empty() {
        return Err(VerifyError::parse("CSV header line is blank"));
    }
    let headers = split_line(header_line, options);
    check_unique_headers(&headers)?;

    Ok(lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| DataRow::from_parts(&headers, split_line(line, options)))
        .collect())
}

/// Split one line into trimmed fields
pub(crate) fn split_line(line: &str, options: &CsvOptions) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && options.quotes == QuoteMode::Escaped && chars.peek() == Some(&'"') {
                chars.next();
                field.push('"');
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == options.delimiter && !in_quotes {
            fields.push(field.trim().to_string());
            field.clear();
        } else {
            field.push(c);
        }
    }
    fields.push(field.trim().to_string());
    fields
}
