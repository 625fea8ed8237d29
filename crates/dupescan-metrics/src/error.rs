use thiserror::Error;

/// Errors raised when selecting a metric by name.
///
/// Metric functions themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricError {
    #[error("unknown metric '{0}' (expected jaro, jaro-winkler, levenshtein or jaccard)")]
    UnknownMetric(String),
}
