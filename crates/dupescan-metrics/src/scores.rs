//! Per-metric score vectors.

use serde::{Deserialize, Serialize};

use crate::MetricKind;

/// One score per [`MetricKind`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricScores {
    pub jaro: f64,
    pub jaro_winkler: f64,
    pub levenshtein: f64,
    pub jaccard: f64,
}

impl MetricScores {
    /// Scores with the same value for every metric.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            jaro: value,
            jaro_winkler: value,
            levenshtein: value,
            jaccard: value,
        }
    }

    /// Scores computed by running every metric on `a` and `b`.
    #[must_use]
    pub fn compute(a: &str, b: &str) -> Self {
        let mut scores = Self::default();
        for kind in MetricKind::ALL {
            scores.set(kind, kind.compute(a, b));
        }
        scores
    }

    #[must_use]
    pub const fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Jaro => self.jaro,
            MetricKind::JaroWinkler => self.jaro_winkler,
            MetricKind::Levenshtein => self.levenshtein,
            MetricKind::Jaccard => self.jaccard,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: f64) {
        match kind {
            MetricKind::Jaro => self.jaro = value,
            MetricKind::JaroWinkler => self.jaro_winkler = value,
            MetricKind::Levenshtein => self.levenshtein = value,
            MetricKind::Jaccard => self.jaccard = value,
        }
    }

    /// Iterate `(kind, score)` in [`MetricKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, f64)> + '_ {
        MetricKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Highest score among `selection`.
    ///
    /// Ties go to the metric listed first in [`MetricKind::ALL`]. Returns
    /// `None` for an empty selection.
    #[must_use]
    pub fn best_of(&self, selection: &[MetricKind]) -> Option<(MetricKind, f64)> {
        let mut best: Option<(MetricKind, f64)> = None;
        for kind in MetricKind::ALL {
            if !selection.contains(&kind) {
                continue;
            }
            let score = self.get(kind);
            match best {
                Some((_, current)) if current >= score => {}
                _ => best = Some((kind, score)),
            }
        }
        best
    }

    /// Apply `f` to every score.
    #[must_use]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            jaro: f(self.jaro),
            jaro_winkler: f(self.jaro_winkler),
            levenshtein: f(self.levenshtein),
            jaccard: f(self.jaccard),
        }
    }
}
