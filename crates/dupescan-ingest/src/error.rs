//! Error types for dataset ingestion.

use std::path::PathBuf;

use dupescan_model::ModelError;
use thiserror::Error;

/// Errors that can occur while loading descriptions and rows.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Row Errors ===
    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row does not have one value per described column.
    #[error("{path}, line {line}: found {found} values, expected {expected}")]
    ArityMismatch {
        path: PathBuf,
        line: u64,
        position: usize,
        expected: usize,
        found: usize,
    },

    // === Description Errors ===
    #[error("malformed description {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("column #{index} in {path} has no '{attribute}' attribute")]
    MissingAttribute {
        path: PathBuf,
        index: usize,
        attribute: &'static str,
    },

    #[error("invalid {attribute} value '{value}' for column '{column}' in {path}")]
    InvalidAttribute {
        path: PathBuf,
        column: String,
        attribute: String,
        value: String,
    },

    #[error("invalid description {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

impl IngestError {
    pub(crate) fn file_read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
