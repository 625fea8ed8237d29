//! Error types for column descriptions and datasets.

use thiserror::Error;

/// Why a single column specification was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ColumnSpecIssue {
    #[error("column name must not be empty")]
    EmptyName,

    #[error("weight {0} is outside [0, 1]")]
    WeightOutOfRange(f64),
}

/// Why a complete description was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptionIssue {
    #[error("at least 2 columns are required, found {found}")]
    TooFewColumns { found: usize },

    #[error("at least one identifier column is required")]
    NoIdentifier,

    #[error("{identifiers} of {columns} columns are identifiers; at least one column must be comparable")]
    NoComparableColumn { identifiers: usize, columns: usize },

    #[error("column '{0}' is declared more than once")]
    DuplicateColumn(String),
}

/// Errors raised while building descriptions and datasets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A column specification failed validation.
    #[error("invalid column '{name}': {issue}")]
    InvalidColumnSpec {
        name: String,
        #[source]
        issue: ColumnSpecIssue,
    },

    /// The column list as a whole is unusable.
    #[error("invalid description: {0}")]
    DescriptionInvalid(#[from] DescriptionIssue),

    /// A record does not have one value per column.
    #[error("record {position} has {found} values, expected {expected}")]
    ArityMismatch {
        position: usize,
        expected: usize,
        found: usize,
    },
}

impl ModelError {
    /// Record position carried by an arity error.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::ArityMismatch { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
