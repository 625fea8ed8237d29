//! The closed set of similarity metrics and their dispatch table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::{jaccard, jaro, jaro_winkler, levenshtein};

/// Signature shared by every metric function.
pub type MetricFn = fn(&str, &str) -> f64;

/// A string similarity metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    Jaro,
    JaroWinkler,
    Levenshtein,
    Jaccard,
}

static METRICS: [(MetricKind, MetricFn); 4] = [
    (MetricKind::Jaro, jaro),
    (MetricKind::JaroWinkler, jaro_winkler),
    (MetricKind::Levenshtein, levenshtein),
    (MetricKind::Jaccard, jaccard),
];

impl MetricKind {
    /// Every metric, in report order.
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Jaro,
        MetricKind::JaroWinkler,
        MetricKind::Levenshtein,
        MetricKind::Jaccard,
    ];

    /// Position of this metric in [`MetricKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Jaro => 0,
            Self::JaroWinkler => 1,
            Self::Levenshtein => 2,
            Self::Jaccard => 3,
        }
    }

    /// The function implementing this metric.
    #[must_use]
    pub fn function(self) -> MetricFn {
        METRICS[self.index()].1
    }

    /// Similarity of `a` and `b` according to this metric.
    #[must_use]
    pub fn compute(self, a: &str, b: &str) -> f64 {
        (self.function())(a, b)
    }

    /// Stable machine name (`jaro`, `jaro-winkler`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Jaro => "jaro",
            Self::JaroWinkler => "jaro-winkler",
            Self::Levenshtein => "levenshtein",
            Self::Jaccard => "jaccard",
        }
    }

    /// Human-readable label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jaro => "Jaro",
            Self::JaroWinkler => "Jaro-Winkler",
            Self::Levenshtein => "Levenshtein",
            Self::Jaccard => "Jaccard",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MetricKind {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MetricKind::ALL
            .into_iter()
            .find(|kind| {
                kind.name().eq_ignore_ascii_case(wanted) || kind.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| MetricError::UnknownMetric(s.to_string()))
    }
}
