//! Spreadsheet reader for xlsx, xls and ods workbooks.

use super::{check_unique_headers, DataRow};
use crate::result::{VerifyError, VerifyResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;

/// Largest magnitude at which every integral `f64` still prints exactly as `i64`
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Read one worksheet into rows.
///
/// Row 0 holds the headers. Columns with a blank header cell are left out,
/// and rows with no non-empty cell under a named column are skipped.
///
/// # Errors
///
/// Returns error if the workbook cannot be opened, the sheet does not exist,
/// or the header row is empty
pub fn read_sheet(path: impl AsRef<Path>, sheet_name: &str) -> VerifyResult<Vec<DataRow>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| VerifyError::parse(format!("cannot open {}: {e}", path.display())))?;

    if !workbook.sheet_names().iter().any(|name| name == sheet_name) {
        return Err(VerifyError::parse(format!(
            "sheet {sheet_name:?} not found in {}",
            path.display()
        )));
    }
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| VerifyError::parse(format!("cannot read sheet {sheet_name:?}: {e}")))?;

    let rows = rows_from_range(&range).map_err(|e| match e {
        VerifyError::Parse { message } => {
            VerifyError::parse(format!("sheet {sheet_name:?}: {message}"))
        }
        other => other,
    })?;
    debug!(file = %path.display(), sheet = sheet_name, rows = rows.len(), "loaded sheet");
    Ok(rows)
}

fn rows_from_range(range: &Range<Data>) -> VerifyResult<Vec<DataRow>> {
    let Some((last_row, last_col)) = range.end() else {
        return Err(VerifyError::parse("sheet is empty"));
    };

    // (column index, header) for every named header cell
    let columns: Vec<(u32, String)> = (0..=last_col)
        .filter_map(|col| {
            let header = cell_at(range, 0, col);
            let header = header.trim();
            (!header.is_empty()).then(|| (col, header.to_string()))
        })
        .collect();
    if columns.is_empty() {
        return Err(VerifyError::parse("header row is empty"));
    }
    let headers: Vec<String> = columns.iter().map(|(_, h)| h.clone()).collect();
    check_unique_headers(&headers)?;

    let mut rows = Vec::new();
    for row in 1..=last_row {
        let values: Vec<String> = columns
            .iter()
            .map(|&(col, _)| cell_at(range, row, col))
            .collect();
        if values.iter().all(String::is_empty) {
            continue;
        }
        rows.push(DataRow::from_parts(&headers, values));
    }
    Ok(rows)
}

fn cell_at(range: &Range<Data>, row: u32, col: u32) -> String {
    range.get_value((row, col)).map(cell_to_string).unwrap_or_default()
}

/// Render a cell as test input text.
///
/// Integral numbers drop their fractional part (`5.0` is `"5"`), date-times
/// become their serial number, and error cells read as empty. Formula cells
/// arrive as their cached result and follow the same rules.
#[must_use]
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < EXACT_INT_LIMIT {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}
