//! Validated, ordered column lists.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::column::ColumnSpec;
use crate::error::{DescriptionIssue, Result};

/// The ordered columns of a dataset.
///
/// A description holds at least two columns, at least one identifier and at
/// least one comparable column. Column names are unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DatasetDescription {
    columns: Vec<ColumnSpec>,
}

impl DatasetDescription {
    pub fn new(columns: Vec<ColumnSpec>) -> Result<Self> {
        if columns.len() < 2 {
            return Err(DescriptionIssue::TooFewColumns {
                found: columns.len(),
            }
            .into());
        }

        let identifiers = columns.iter().filter(|c| c.is_identifier()).count();
        if identifiers == 0 {
            return Err(DescriptionIssue::NoIdentifier.into());
        }
        if identifiers > columns.len() - 1 {
            return Err(DescriptionIssue::NoComparableColumn {
                identifiers,
                columns: columns.len(),
            }
            .into());
        }

        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(DescriptionIssue::DuplicateColumn(column.name().to_string()).into());
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Number of columns, which is also the arity of every record.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false: a valid description has at least two columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn identifier_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_identifier()).count()
    }

    /// Number of columns that contribute to the aggregate score.
    pub fn scored_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_scored()).count()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Indices of identifier and displayed columns, in column order.
    pub fn display_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.is_shown())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnSpec> {
        self.columns.iter()
    }
}

impl<'a> IntoIterator for &'a DatasetDescription {
    type Item = &'a ColumnSpec;
    type IntoIter = std::slice::Iter<'a, ColumnSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
