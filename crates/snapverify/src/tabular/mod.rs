//! Data-driven test inputs from CSV files and spreadsheets.
//!
//! Both readers produce [`DataRow`]s: column name to string value, in header
//! order. [`params`] turns rows into test-case parameter lists.

pub mod csv;
pub mod params;
pub mod sheet;

use crate::result::{VerifyError, VerifyResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

/// One record: header name to string value, in header order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRow {
    entries: Vec<(String, String)>,
}

impl DataRow {
    /// Build a row from headers and values.
    ///
    /// Missing values become `""`; surplus values are dropped.
    pub(crate) fn from_parts(headers: &[String], values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        let entries = headers
            .iter()
            .map(|h| (h.clone(), values.next().unwrap_or_default()))
            .collect();
        Self { entries }
    }

    /// Value for `column`
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v.as_str())
    }

    /// Number of columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the row has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Column names in header order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Values in header order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    /// `(column, value)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for DataRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Reject header lists that name the same column twice
pub(crate) fn check_unique_headers(headers: &[String]) -> VerifyResult<()> {
    let mut seen = HashSet::with_capacity(headers.len());
    for header in headers {
        if !seen.insert(header.as_str()) {
            return Err(VerifyError::parse(format!("duplicate column {header:?}")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_from_parts_pads_and_truncates() {
        let h = headers(&["a", "b", "c"]);
        let short = DataRow::from_parts(&h, vec!["1".into()]);
        assert_eq!(short.get("a"), Some("1"));
        assert_eq!(short.get("c"), Some(""));

        let long = DataRow::from_parts(&h, vec!["1".into(), "2".into(), "3".into(), "4".into()]);
        assert_eq!(long.len(), 3);
        assert_eq!(long.values().collect::<Vec<_>>(), ["1", "2", "3"]);
    }

    #[test]
    fn test_lookup_and_order() {
        let row = DataRow::from_parts(&headers(&["z", "a"]), vec!["1".into(), "2".into()]);
        assert_eq!(row.columns().collect::<Vec<_>>(), ["z", "a"]);
        assert_eq!(row.get("missing"), None);
        assert!(!row.is_empty());
        assert_eq!(row.iter().next(), Some(("z", "1")));
    }

    #[test]
    fn test_serializes_in_header_order() {
        let row = DataRow::from_parts(&headers(&["user", "age"]), vec!["ann".into(), "7".into()]);
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"user":"ann","age":"7"}"#
        );
    }

    #[test]
    fn test_check_unique_headers() {
        assert!(check_unique_headers(&headers(&["a", "b"])).is_ok());
        let err = check_unique_headers(&headers(&["a", "b", "a"])).unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }
}
