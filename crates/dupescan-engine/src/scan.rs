//! Pairwise scanning over an in-memory dataset.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::time::Instant;

use dupescan_metrics::{MetricKind, MetricScores};
use dupescan_model::{Dataset, DatasetDescription, Record};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::aggregate::aggregate;
use crate::cancel::CancelToken;
use crate::error::{Result, ScanError};
use crate::normalize::NormalizedRecord;
use crate::options::{ScanOptions, available_threads};

/// Matches buffered between the worker pool and the sink of a parallel scan.
pub const MATCH_QUEUE_DEPTH: usize = 256;

type QueueResult<'a> = std::result::Result<(), mpsc::SendError<PairMatch<'a>>>;

/// Callback receiving the number of outer rows completed so far.
pub type ProgressFn = dyn Fn(usize) + Send + Sync;

/// Scores of one unordered pair of records, `left < right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairEvaluation {
    pub left: usize,
    pub right: usize,
    pub scores: MetricScores,
}

/// A pair whose score reached the threshold for at least one selected metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairMatch<'a> {
    pub left: usize,
    pub right: usize,
    pub left_record: &'a Record,
    pub right_record: &'a Record,
    pub scores: MetricScores,
    /// Best selected metric, the one reported as the pair's score.
    pub metric: MetricKind,
    pub score: f64,
}

impl PairMatch<'_> {
    /// Canonical ordering key.
    pub fn key(&self) -> (usize, usize) {
        (self.left, self.right)
    }
}

/// Counters describing a finished or in-progress scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub records: usize,
    pub pairs_evaluated: u64,
    pub pairs_emitted: u64,
}

/// Matches and counters of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome<'a> {
    pub matches: Vec<PairMatch<'a>>,
    pub stats: ScanStats,
}

/// Compares every unordered pair of records of a dataset exactly once.
///
/// Records are normalized once, when the scanner is built, and kept in
/// memory for the lifetime of the scanner.
///
/// # Example
///
/// ```
/// use dupescan_engine::{PairScanner, ScanOptions};
/// use dupescan_model::{ColumnSpec, DatasetDescription, Record};
///
/// let description = DatasetDescription::new(vec![
///     ColumnSpec::identifier("id")?,
///     ColumnSpec::comparable("name", 1.0)?,
/// ])?;
/// let rows = vec![
///     Record::from_iter(["1", "MARTHA"]),
///     Record::from_iter(["2", "MARHTA"]),
///     Record::from_iter(["3", "ZZZZZ"]),
/// ];
/// let scanner = PairScanner::from_records(description, rows, ScanOptions::default().with_threshold(0.9))?;
/// let keys: Vec<_> = scanner.pairs().map(|m| m.map(|m| m.key())).collect::<Result<_, _>>()?;
/// assert_eq!(keys, vec![(0, 1)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PairScanner {
    dataset: Dataset,
    normalized: Vec<NormalizedRecord>,
    options: ScanOptions,
    cancel: CancelToken,
    progress: Option<Arc<ProgressFn>>,
}

impl fmt::Debug for PairScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairScanner")
            .field("records", &self.dataset.len())
            .field("options", &self.options)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl PairScanner {
    /// Validate `options` and normalize every record of `dataset`.
    pub fn new(dataset: Dataset, options: ScanOptions) -> Result<Self> {
        options.validate()?;
        let start = Instant::now();
        let description = dataset.description();
        let normalized: Vec<NormalizedRecord> = dataset
            .records()
            .iter()
            .map(|record| NormalizedRecord::new(description, record))
            .collect();
        debug!(
            records = normalized.len(),
            columns = description.len(),
            scored_columns = description.scored_count(),
            duration_ms = start.elapsed().as_millis(),
            "records normalized"
        );
        Ok(Self {
            dataset,
            normalized,
            options,
            cancel: CancelToken::new(),
            progress: None,
        })
    }

    /// Materialize `records` and build a scanner over them.
    ///
    /// Fails with [`dupescan_model::ModelError::ArityMismatch`] at the first
    /// record whose value count differs from the column count.
    pub fn from_records<I>(
        description: DatasetDescription,
        records: I,
        options: ScanOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let dataset = Dataset::from_records(description, records)?;
        Self::new(dataset, options)
    }

    /// Observe cancellation through `token`.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Call `progress` after each outer row with the number of rows done.
    #[must_use]
    pub fn with_progress(mut self, progress: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Score the pair `(left, right)`.
    ///
    /// Returns `None` unless `left < right < self.len()`.
    pub fn evaluate(&self, left: usize, right: usize) -> Option<PairEvaluation> {
        if left >= right {
            return None;
        }
        let scores = aggregate(
            self.dataset.description().columns(),
            self.normalized.get(left)?,
            self.normalized.get(right)?,
        );
        Some(PairEvaluation {
            left,
            right,
            scores,
        })
    }

    /// Turn an evaluation into a match if any selected metric reaches the
    /// threshold.
    pub fn accept(&self, evaluation: PairEvaluation) -> Option<PairMatch<'_>> {
        let (metric, score) = evaluation.scores.best_of(&self.options.metrics)?;
        if score < self.options.threshold {
            return None;
        }
        let records = self.dataset.records();
        Some(PairMatch {
            left: evaluation.left,
            right: evaluation.right,
            left_record: records.get(evaluation.left)?,
            right_record: records.get(evaluation.right)?,
            scores: evaluation.scores,
            metric,
            score,
        })
    }

    fn matching(&self, left: usize, right: usize) -> Option<PairMatch<'_>> {
        self.evaluate(left, right)
            .and_then(|evaluation| self.accept(evaluation))
    }

    /// Lazily enumerate matching pairs in `(left, right)` order on the
    /// calling thread.
    ///
    /// Each call starts a fresh pass over the records.
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs {
            scanner: self,
            left: 0,
            right: 0,
            row_started: false,
            finished: false,
            stats: ScanStats {
                records: self.len(),
                ..ScanStats::default()
            },
        }
    }

    /// Hand every match to `sink` as soon as it is found.
    ///
    /// Runs on the calling thread in `(left, right)` order when `threads` is
    /// 0. Otherwise pairs are scored on a dedicated worker pool and reach
    /// `sink` in no particular order, still on the calling thread. Matches
    /// are not retained: at most [`MATCH_QUEUE_DEPTH`] wait between the
    /// workers and `sink`.
    ///
    /// The scan stops at the first error returned by `sink`.
    pub fn scan_with<'a, F, E>(&'a self, sink: F) -> std::result::Result<ScanStats, E>
    where
        F: FnMut(PairMatch<'a>) -> std::result::Result<(), E>,
        E: From<ScanError>,
    {
        let span = info_span!(
            "scan",
            records = self.len(),
            threads = self.options.threads,
            threshold = self.options.threshold
        );
        let _guard = span.enter();
        let start = Instant::now();

        let stats = if self.options.is_parallel() {
            self.stream_parallel(self.options.threads, sink)?
        } else {
            self.stream_sequential(sink)?
        };

        info!(
            records = stats.records,
            pairs_evaluated = stats.pairs_evaluated,
            pairs_emitted = stats.pairs_emitted,
            duration_ms = start.elapsed().as_millis(),
            "scan complete"
        );
        Ok(stats)
    }

    /// Run the scan and collect every match in `(left, right)` order.
    ///
    /// Holds all matches in memory; use [`PairScanner::scan_with`] or
    /// [`PairScanner::pairs`] when the output may be large.
    pub fn scan(&self) -> Result<ScanOutcome<'_>> {
        let mut matches = Vec::new();
        let stats = self.scan_with(|found| {
            matches.push(found);
            Ok::<_, ScanError>(())
        })?;
        matches.sort_unstable_by_key(PairMatch::key);
        Ok(ScanOutcome { matches, stats })
    }

    /// Evaluate every pair on a bounded worker pool and collect the matches.
    ///
    /// Matches come back in no particular order; sort by
    /// [`PairMatch::key`] when a canonical order is needed. With `threads`
    /// set to 0 the pool is sized to the available hardware threads.
    pub fn scan_parallel(&self) -> Result<ScanOutcome<'_>> {
        let mut matches = Vec::new();
        let stats = self.stream_parallel(self.options.threads, |found| {
            matches.push(found);
            Ok::<_, ScanError>(())
        })?;
        Ok(ScanOutcome { matches, stats })
    }

    fn stream_sequential<'a, F, E>(&'a self, mut sink: F) -> std::result::Result<ScanStats, E>
    where
        F: FnMut(PairMatch<'a>) -> std::result::Result<(), E>,
        E: From<ScanError>,
    {
        let mut pairs = self.pairs();
        for found in pairs.by_ref() {
            sink(found?)?;
        }
        Ok(pairs.stats())
    }

    fn stream_parallel<'a, F, E>(
        &'a self,
        threads: usize,
        mut sink: F,
    ) -> std::result::Result<ScanStats, E>
    where
        F: FnMut(PairMatch<'a>) -> std::result::Result<(), E>,
        E: From<ScanError>,
    {
        let threads = match threads {
            0 => available_threads(),
            n => n,
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("dupescan-{index}"))
            .build()
            .map_err(ScanError::from)?;
        debug!(threads, "worker pool started");

        let n = self.len();
        let cancelled_at = AtomicUsize::new(usize::MAX);
        let rows_done = AtomicUsize::new(0);
        let evaluated = AtomicU64::new(0);
        let mut emitted = 0u64;
        let (sender, receiver) = mpsc::sync_channel::<PairMatch<'a>>(MATCH_QUEUE_DEPTH);

        let sunk = pool.in_place_scope(|scope| {
            let counters = (&cancelled_at, &rows_done, &evaluated);
            scope.spawn(move |_| {
                let (cancelled_at, rows_done, evaluated) = counters;
                // A send fails only once the receiver is gone, which ends the scan.
                let _ = (0..n)
                    .into_par_iter()
                    .try_for_each_with(sender, |sender, left| -> QueueResult<'a> {
                        if self.cancel.is_cancelled() {
                            cancelled_at.fetch_min(left, Ordering::SeqCst);
                            return Ok(());
                        }
                        for right in left + 1..n {
                            if let Some(found) = self.matching(left, right) {
                                sender.send(found)?;
                            }
                        }
                        evaluated.fetch_add((n - left - 1) as u64, Ordering::Relaxed);
                        let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
                        self.report_progress(done);
                        Ok(())
                    });
            });

            let result = receiver.iter().try_for_each(|found| {
                emitted += 1;
                sink(found)
            });
            drop(receiver);
            result
        });
        sunk?;

        let position = cancelled_at.load(Ordering::SeqCst);
        if position != usize::MAX {
            debug!(position, "scan cancelled");
            return Err(ScanError::Cancelled { position }.into());
        }

        Ok(ScanStats {
            records: n,
            pairs_evaluated: evaluated.load(Ordering::SeqCst),
            pairs_emitted: emitted,
        })
    }

    fn report_progress(&self, rows_done: usize) {
        if let Some(progress) = &self.progress {
            progress(rows_done);
        }
    }
}

/// Lazy iterator over matching pairs; see [`PairScanner::pairs`].
///
/// Yields `Err(ScanError::Cancelled)` once and then ends if the scanner's
/// cancel token fires.
pub struct Pairs<'a> {
    scanner: &'a PairScanner,
    left: usize,
    right: usize,
    row_started: bool,
    finished: bool,
    stats: ScanStats,
}

impl Pairs<'_> {
    /// Counters for the pairs visited so far.
    pub fn stats(&self) -> ScanStats {
        self.stats
    }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = Result<PairMatch<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let scanner = self.scanner;
        let n = scanner.len();

        loop {
            if self.left >= n {
                self.finished = true;
                return None;
            }

            if !self.row_started {
                if scanner.cancel.is_cancelled() {
                    self.finished = true;
                    debug!(position = self.left, "scan cancelled");
                    return Some(Err(ScanError::Cancelled {
                        position: self.left,
                    }));
                }
                self.row_started = true;
                self.right = self.left + 1;
            }

            if self.right >= n {
                self.left += 1;
                self.row_started = false;
                scanner.report_progress(self.left);
                continue;
            }

            let found = scanner.matching(self.left, self.right);
            self.right += 1;
            self.stats.pairs_evaluated += 1;
            if let Some(found) = found {
                self.stats.pairs_emitted += 1;
                return Some(Ok(found));
            }
        }
    }
}

impl std::iter::FusedIterator for Pairs<'_> {}
