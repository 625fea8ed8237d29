use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to render HTML report: {message}")]
    Html { message: String },

    #[error("failed to render CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to render JSON report: {0}")]
    Json(#[from] serde_json::Error),

    /// The scan feeding the report stopped.
    #[error(transparent)]
    Scan(#[from] dupescan_engine::ScanError),

    #[error("unknown report format '{0}' (expected html, csv or json)")]
    UnknownFormat(String),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
