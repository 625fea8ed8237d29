//! Per-column value normalization.

use dupescan_model::{ColumnSpec, DatasetDescription, Record};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// A record after each column's case and diacritic policy was applied.
///
/// Identifier columns and absent values are `None`; both are left out of
/// the comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    values: Vec<Option<String>>,
}

impl NormalizedRecord {
    /// Normalize every value of `record` against `description`.
    pub fn new(description: &DatasetDescription, record: &Record) -> Self {
        let values = description
            .iter()
            .zip(record.values())
            .map(|(column, raw)| normalize_value(column, raw.as_deref()))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(Option::as_deref)
    }
}

/// Apply a column's normalization policy to one raw value.
///
/// Diacritics are removed by canonical decomposition followed by dropping
/// combining marks; case folding upper-cases the result.
pub fn normalize_value(column: &ColumnSpec, raw: Option<&str>) -> Option<String> {
    if column.is_identifier() {
        return None;
    }
    let raw = raw?;
    let value = if column.ignore_diacritics() {
        strip_diacritics(raw)
    } else {
        raw.to_string()
    };
    if column.match_case() {
        Some(value)
    } else {
        Some(value.to_uppercase())
    }
}

/// Remove combining marks after canonical decomposition.
pub fn strip_diacritics(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}
