//! Weighted pairwise duplicate scanning.
//!
//! The engine normalizes each record once, then compares every unordered
//! pair of records. For each pair the four metrics of [`dupescan_metrics`]
//! are combined across columns by weight, and the pair is emitted when any
//! selected metric reaches the threshold.
//!
//! - [`normalize_value`]: case folding and diacritic stripping per column
//! - [`aggregate()`]: weighted per-metric combination of one pair
//! - [`PairScanner`]: sequential, lazy and parallel enumeration of pairs;
//!   [`PairScanner::scan_with`] streams matches into a sink without keeping them

mod aggregate;
mod cancel;
mod error;
mod normalize;
mod options;
mod scan;

pub use aggregate::aggregate;
pub use cancel::CancelToken;
pub use error::{Result, ScanError};
pub use normalize::{NormalizedRecord, normalize_value, strip_diacritics};
pub use options::{DEFAULT_THRESHOLD, ScanOptions, available_threads};
pub use scan::{
    MATCH_QUEUE_DEPTH, PairEvaluation, PairMatch, PairScanner, Pairs, ProgressFn, ScanOutcome,
    ScanStats,
};
