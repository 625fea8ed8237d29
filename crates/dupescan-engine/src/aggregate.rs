//! Weighted combination of per-column metric scores.

use dupescan_metrics::{MetricKind, MetricScores};
use dupescan_model::ColumnSpec;

use crate::normalize::NormalizedRecord;

/// Combine two normalized records into one score per metric.
///
/// For each column with a positive weight where both values are present:
///
/// - an empty value on either side contributes 0 but its weight still counts
/// - equal values contribute the full weight to every metric
/// - otherwise each metric contributes `weight * metric(a, b)`
///
/// Each sum is divided by the total weight that took part. When no column
/// took part every score is 0.
pub fn aggregate(
    columns: &[ColumnSpec],
    left: &NormalizedRecord,
    right: &NormalizedRecord,
) -> MetricScores {
    let mut sums = MetricScores::default();
    let mut total_weight = 0.0;

    let values = left.values().iter().zip(right.values());
    for (column, (a, b)) in columns.iter().zip(values) {
        let weight = column.weight();
        if weight <= 0.0 {
            continue;
        }
        let (Some(a), Some(b)) = (a.as_deref(), b.as_deref()) else {
            continue;
        };
        total_weight += weight;

        if a.is_empty() || b.is_empty() {
            continue;
        }
        for kind in MetricKind::ALL {
            let similarity = if a == b { 1.0 } else { kind.compute(a, b) };
            sums.set(kind, sums.get(kind) + weight * similarity);
        }
    }

    if total_weight > 0.0 {
        sums.map(|sum| sum / total_weight)
    } else {
        MetricScores::default()
    }
}
