//! Scan configuration.

use dupescan_metrics::MetricKind;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Threshold applied when none is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Options controlling a pairwise scan.
///
/// # Example
///
/// ```
/// use dupescan_engine::ScanOptions;
/// use dupescan_metrics::MetricKind;
///
/// let options = ScanOptions::default()
///     .with_threshold(0.9)
///     .with_metrics(vec![MetricKind::JaroWinkler])
///     .with_threads(4);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Minimum aggregate score, in `[0, 1]`, that any selected metric must
    /// reach for a pair to be emitted.
    pub threshold: f64,

    /// Metrics whose aggregate score is tested against the threshold.
    pub metrics: Vec<MetricKind>,

    /// Worker threads; 0 scans sequentially on the calling thread.
    pub threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            metrics: MetricKind::ALL.to_vec(),
            threads: 0,
        }
    }
}

impl ScanOptions {
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Replace the metric selection. Duplicates are dropped and the order
    /// follows [`MetricKind::ALL`].
    #[must_use]
    pub fn with_metrics(mut self, mut metrics: Vec<MetricKind>) -> Self {
        metrics.sort_unstable();
        metrics.dedup();
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ScanError::InvalidThreshold(self.threshold));
        }
        if self.metrics.is_empty() {
            return Err(ScanError::NoMetricSelected);
        }
        Ok(())
    }

    pub fn is_parallel(&self) -> bool {
        self.threads > 0
    }
}

/// Number of hardware threads, or 1 when it cannot be determined.
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}
