//! Error types for pairwise scanning.

use dupescan_model::ModelError;
use thiserror::Error;

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The description or a record was rejected.
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("at least one metric must be selected")]
    NoMetricSelected,

    /// The caller cancelled the scan before record `position` was compared.
    #[error("scan cancelled at record {position}")]
    Cancelled { position: usize },

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ScanError {
    /// Record position the error refers to, when it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Model(error) => error.position(),
            Self::Cancelled { position } => Some(*position),
            _ => None,
        }
    }
}

/// Result type for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;
