//! Jaro and Jaro-Winkler similarity.
//!
//! Both functions compare strings as sequences of Unicode scalar values and
//! return a score between 0.0 (nothing in common) and 1.0 (identical).

/// Prefix scaling factor proposed by Winkler.
pub const WINKLER_SCALING: f64 = 0.1;

/// Longest common prefix rewarded by Jaro-Winkler.
pub const WINKLER_PREFIX_CAP: usize = 4;

/// Jaro similarity of two strings.
///
/// Two empty strings score 1.0; an empty string against a non-empty one
/// scores 0.0.
pub fn jaro(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    jaro_chars(&a, &b)
}

/// Jaro-Winkler similarity of two strings.
///
/// Boosts the Jaro score by the length of the common prefix, capped at
/// [`WINKLER_PREFIX_CAP`] characters.
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let similarity = jaro(a, b);
    let prefix = a
        .chars()
        .zip(b.chars())
        .take(WINKLER_PREFIX_CAP)
        .take_while(|(left, right)| left == right)
        .count();
    similarity + prefix as f64 * WINKLER_SCALING * (1.0 - similarity)
}

fn jaro_chars(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // floor(max / 2) - 1, clamped so one-character strings can still match.
    let window = (a.len().max(b.len()) / 2).saturating_sub(1);

    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, &ch) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());
        if start >= end {
            continue;
        }
        // Leftmost unmatched occurrence inside the window wins.
        if let Some(j) = (start..end).find(|&j| !b_matched[j] && b[j] == ch) {
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut b_sequence = b
        .iter()
        .zip(&b_matched)
        .filter_map(|(ch, matched)| matched.then_some(ch));
    let transpositions = a
        .iter()
        .zip(&a_matched)
        .filter_map(|(ch, matched)| matched.then_some(ch))
        .filter(|ch| b_sequence.next() != Some(*ch))
        .count();

    let m = matches as f64;
    let t = transpositions as f64 / 2.0;
    (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_characters_match_themselves() {
        assert_eq!(jaro("A", "A"), 1.0);
        assert_eq!(jaro("A", "B"), 0.0);
    }

    #[test]
    fn empty_strings() {
        assert_eq!(jaro("", ""), 1.0);
        assert_eq!(jaro("", "ABC"), 0.0);
        assert_eq!(jaro("ABC", ""), 0.0);
        assert_eq!(jaro_winkler("", ""), 1.0);
    }

    #[test]
    fn transpositions_are_halved() {
        // M A R T H A vs M A R H T A: T/H swap counts as one transposition.
        let score = jaro("MARTHA", "MARHTA");
        let expected = (1.0 + 1.0 + 5.0 / 6.0) / 3.0;
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn prefix_bonus_is_capped() {
        let jaro_score = jaro("ABCDEFGH", "ABCDEFXY");
        let winkler = jaro_winkler("ABCDEFGH", "ABCDEFXY");
        let expected = jaro_score + 4.0 * WINKLER_SCALING * (1.0 - jaro_score);
        assert!((winkler - expected).abs() < 1e-12);
    }

    #[test]
    fn compares_unicode_scalars() {
        assert_eq!(jaro("ÉTÉ", "ÉTÉ"), 1.0);
        assert!(jaro("ÉTÉ", "ETE") < 1.0);
    }
}
