//! String similarity metrics.
//!
//! Four independent, pure functions map a pair of strings to a similarity in
//! `[0.0, 1.0]`, where 1.0 means identical:
//!
//! - [`jaro`]: matching characters within a sliding window, penalizing transpositions
//! - [`jaro_winkler`]: Jaro with a bonus for a shared prefix of up to four characters
//! - [`levenshtein`]: edit distance normalized by the longer string
//! - [`jaccard`]: Jaccard index of the character bigram sets
//!
//! Every metric scores two empty strings as 1.0 and never fails.
//!
//! # Example
//!
//! ```
//! use dupescan_metrics::{MetricKind, jaro};
//!
//! assert!(jaro("MARTHA", "MARHTA") > 0.94);
//! assert_eq!(MetricKind::Levenshtein.compute("DIXON", "DICKSONX"), 0.5);
//! ```

#![deny(unsafe_code)]

mod error;
mod jaccard;
mod jaro;
mod kind;
mod levenshtein;
mod scores;

pub use error::MetricError;
pub use jaccard::{NGRAM_LENGTH, jaccard};
pub use jaro::{WINKLER_PREFIX_CAP, WINKLER_SCALING, jaro, jaro_winkler};
pub use kind::{MetricFn, MetricKind};
pub use levenshtein::{levenshtein, levenshtein_distance};
pub use scores::MetricScores;
