//! Adapters from tabular rows to parameterized test cases.

use super::csv::{read_csv, CsvOptions};
use super::sheet::read_sheet;
use super::DataRow;
use crate::result::{VerifyError, VerifyResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One test case carrying a whole row as its single parameter
pub type RowParameters = [DataRow; 1];

/// Where a data-driven test reads its rows from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// CSV file
    Csv {
        /// File path
        path: PathBuf,
        /// Parsing options
        #[serde(default)]
        options: CsvOptions,
    },
    /// Worksheet of an xlsx/xls/ods workbook
    Sheet {
        /// Workbook path
        path: PathBuf,
        /// Worksheet name
        sheet: String,
    },
}

impl DataSource {
    /// CSV source with default options
    #[must_use]
    pub fn csv(path: impl Into<PathBuf>) -> Self {
        Self::Csv {
            path: path.into(),
            options: CsvOptions::default(),
        }
    }

    /// Worksheet source
    #[must_use]
    pub fn sheet(path: impl Into<PathBuf>, sheet: impl Into<String>) -> Self {
        Self::Sheet {
            path: path.into(),
            sheet: sheet.into(),
        }
    }

    /// Read all rows
    ///
    /// # Errors
    ///
    /// Returns the reader's parse error
    pub fn load(&self) -> VerifyResult<Vec<DataRow>> {
        match self {
            Self::Csv { path, options } => read_csv(path, options),
            Self::Sheet { path, sheet } => read_sheet(path, sheet),
        }
    }

    /// Read all rows as one-row test cases
    ///
    /// # Errors
    ///
    /// Returns the reader's parse error
    pub fn row_parameters(&self) -> VerifyResult<Vec<RowParameters>> {
        self.load().map(row_parameters)
    }

    /// Read the named columns of every row
    ///
    /// # Errors
    ///
    /// Returns the reader's parse error, or an error for an unknown column
    pub fn projected_parameters(&self, columns: &[&str]) -> VerifyResult<Vec<Vec<String>>> {
        projected_parameters(&self.load()?, columns)
    }
}

/// Wrap each row as a single opaque parameter
#[must_use]
pub fn row_parameters(rows: impl IntoIterator<Item = DataRow>) -> Vec<RowParameters> {
    rows.into_iter().map(|row| [row]).collect()
}

/// Pick `columns` from every row, in the requested order
///
/// # Errors
///
/// Returns error if a requested column is not in a row
pub fn projected_parameters(rows: &[DataRow], columns: &[&str]) -> VerifyResult<Vec<Vec<String>>> {
    rows.iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    row.get(column)
                        .map(str::to_string)
                        .ok_or_else(|| VerifyError::parse(format!("unknown column {column:?}")))
                })
                .collect()
        })
        .collect()
}
