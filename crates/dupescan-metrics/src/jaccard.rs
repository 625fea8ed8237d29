//! Jaccard index over character bigrams.

use std::collections::BTreeSet;

/// Length of the shingles compared by [`jaccard`].
pub const NGRAM_LENGTH: usize = 2;

/// Jaccard index of the deduplicated bigram sets of two strings.
///
/// Strings too short to hold a bigram are compared directly: equal strings
/// (including two empty strings) score 1.0, anything else 0.0. When only one
/// side has bigrams the score is 0.0.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let left = shingles(a);
    let right = shingles(b);

    match (left.is_empty(), right.is_empty()) {
        (true, true) => {
            if a == b {
                1.0
            } else {
                0.0
            }
        }
        (true, false) | (false, true) => 0.0,
        (false, false) => {
            let shared = left.intersection(&right).count();
            let union = left.len() + right.len() - shared;
            shared as f64 / union as f64
        }
    }
}

fn shingles(s: &str) -> BTreeSet<Vec<char>> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(NGRAM_LENGTH).map(<[char]>::to_vec).collect()
}
