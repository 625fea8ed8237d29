//! Report contents, independent of the output format.

use chrono::{DateTime, Local};
use dupescan_engine::{PairMatch, ScanOptions};
use dupescan_metrics::{MetricKind, MetricScores};
use dupescan_model::{DatasetDescription, Record};
use serde::Serialize;

/// One side of a reported pair: its position and its shown values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord<'a> {
    pub position: usize,
    pub values: Vec<&'a str>,
}

/// One reported pair, borrowing its values from the scanned records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow<'a> {
    pub left: ReportRecord<'a>,
    pub right: ReportRecord<'a>,
    pub scores: MetricScores,
    pub metric: MetricKind,
    pub score: f64,
}

/// What a report states about the scan as a whole.
///
/// Only identifier and displayed columns are carried; `columns` names them
/// in order and every [`ReportRecord`] holds one value per name.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub threshold: f64,
    pub metrics: Vec<MetricKind>,
    pub columns: Vec<String>,
    indices: Vec<usize>,
}

impl Report {
    /// Report header for `description` scanned with `options`.
    pub fn new(description: &DatasetDescription, options: &ScanOptions) -> Self {
        let indices = description.display_columns();
        let columns = indices
            .iter()
            .map(|&index| description.columns()[index].name().to_string())
            .collect();
        Self {
            generated_at: Local::now(),
            threshold: options.threshold,
            metrics: options.metrics.clone(),
            columns,
            indices,
        }
    }

    #[must_use]
    pub fn with_generated_at(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// The shown values and scores of `found`.
    pub fn row<'a>(&self, found: &PairMatch<'a>) -> ReportRow<'a> {
        ReportRow {
            left: self.shown(found.left, found.left_record),
            right: self.shown(found.right, found.right_record),
            scores: found.scores,
            metric: found.metric,
            score: found.score,
        }
    }

    fn shown<'a>(&self, position: usize, record: &'a Record) -> ReportRecord<'a> {
        let values = self
            .indices
            .iter()
            .map(|&index| record.get(index).unwrap_or_default())
            .collect();
        ReportRecord { position, values }
    }
}
