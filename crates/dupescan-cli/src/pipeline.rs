//! Scan pipeline: load the description and rows, then stream matching pairs
//! into the report as they are found.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, info_span, trace};

use dupescan_engine::{PairMatch, PairScanner, ScanOptions, available_threads};
use dupescan_ingest::{CsvOptions, load_dataset, load_description};
use dupescan_model::{ColumnSpec, DatasetDescription};
use dupescan_report::{Report, ReportError, ReportFormat, create_report};

use crate::logging::redact_value;

/// Environment variable holding the default worker count.
pub const THREADS_ENV: &str = "DUPESCAN_THREADS";

/// Everything needed to run one scan.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub description: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub csv: CsvOptions,
    pub options: ScanOptions,
    /// Inferred from the output extension when `None`.
    pub format: Option<ReportFormat>,
}

/// Outer rows finished so far, out of the dataset size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanProgress {
    pub rows_done: usize,
    pub rows_total: usize,
}

#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub records: usize,
    pub pairs_evaluated: u64,
    pub pairs_emitted: u64,
    /// Worker threads used; 0 means the scan ran sequentially.
    pub threads: usize,
    pub format: ReportFormat,
    pub output: PathBuf,
    pub duration: Duration,
}

/// Pick the report format: the explicit choice, then the output extension, then HTML.
pub fn resolve_format(output: &Path, explicit: Option<ReportFormat>) -> ReportFormat {
    explicit
        .or_else(|| ReportFormat::from_path(output))
        .unwrap_or_default()
}

/// Worker count from the command line, then `DUPESCAN_THREADS`, then the machine.
pub fn resolve_threads(explicit: Option<usize>) -> Result<usize> {
    match explicit {
        Some(threads) => Ok(threads),
        None => threads_from_env(std::env::var(THREADS_ENV).ok().as_deref()),
    }
}

/// Parse a `DUPESCAN_THREADS` value; unset or blank falls back to the machine.
pub fn threads_from_env(value: Option<&str>) -> Result<usize> {
    match value.map(str::trim) {
        None | Some("") => Ok(available_threads()),
        Some(value) => value
            .parse::<usize>()
            .with_context(|| format!("invalid {THREADS_ENV} value `{value}`")),
    }
}

/// Load the column description at `path`.
pub fn describe(path: &Path) -> Result<DatasetDescription> {
    load_description(path).context("load description")
}

pub fn run_scan(request: &ScanRequest) -> Result<ScanSummary> {
    run_scan_with_progress(request, |_| {})
}

/// Run the scan, calling `progress` after each outer row.
pub fn run_scan_with_progress<F>(request: &ScanRequest, progress: F) -> Result<ScanSummary>
where
    F: Fn(ScanProgress) + Send + Sync + 'static,
{
    let started = Instant::now();
    let span = info_span!("pipeline", input = %request.input.display());
    let _guard = span.enter();

    let description = describe(&request.description)?;
    let dataset = load_dataset(&request.input, description, &request.csv).context("load rows")?;
    let rows_total = dataset.len();
    let scanner = PairScanner::new(dataset, request.options.clone())
        .context("prepare scan")?
        .with_progress(move |rows_done| {
            progress(ScanProgress {
                rows_done,
                rows_total,
            });
        });

    let format = resolve_format(&request.output, request.format);
    let output = request.output.display();
    let report = Report::new(scanner.dataset().description(), scanner.options());
    let mut writer = create_report(&request.output, report, format)
        .with_context(|| format!("write report {output}"))?;

    let id_column = identifier_column(scanner.dataset().description());
    let stats = scanner
        .scan_with(|found| {
            trace_match(id_column, &found);
            writer.push(&found)
        })
        .map_err(|error| match error {
            ReportError::Scan(error) => anyhow::Error::new(error).context("scan pairs"),
            error => anyhow::Error::new(error).context(format!("write report {output}")),
        })?;
    writer
        .finish()
        .with_context(|| format!("write report {output}"))?;

    let duration = started.elapsed();
    info!(
        records = stats.records,
        pairs_emitted = stats.pairs_emitted,
        duration_ms = duration.as_millis(),
        "pipeline complete"
    );
    Ok(ScanSummary {
        records: stats.records,
        pairs_evaluated: stats.pairs_evaluated,
        pairs_emitted: stats.pairs_emitted,
        threads: request.options.threads,
        format,
        output: request.output.clone(),
        duration,
    })
}

fn identifier_column(description: &DatasetDescription) -> usize {
    description
        .iter()
        .position(ColumnSpec::is_identifier)
        .unwrap_or(0)
}

fn trace_match(id_column: usize, found: &PairMatch<'_>) {
    trace!(
        left = found.left,
        right = found.right,
        left_id = redact_value(found.left_record.get(id_column).unwrap_or_default()),
        right_id = redact_value(found.right_record.get(id_column).unwrap_or_default()),
        metric = %found.metric,
        score = found.score,
        "pair emitted"
    );
}
