use std::io::{self, IsTerminal};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use dupescan_cli::pipeline::{
    ScanRequest, ScanSummary, describe, resolve_threads, run_scan_with_progress,
};
use dupescan_engine::ScanOptions;
use dupescan_ingest::CsvOptions;

use crate::cli::{DescribeArgs, ScanArgs};
use crate::summary::print_description;

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rows ({eta})";

pub fn run_scan(args: &ScanArgs) -> Result<ScanSummary> {
    let threads = resolve_threads(args.threads)?;
    let mut options = ScanOptions::default()
        .with_threshold(args.min_similarity)
        .with_threads(threads);
    if !args.metrics.is_empty() {
        options = options.with_metrics(args.metrics.clone());
    }
    let request = ScanRequest {
        description: args.description.clone(),
        input: args.input.clone(),
        output: args.output.clone(),
        csv: CsvOptions::default()
            .with_delimiter(args.delimiter)
            .with_header(args.has_header),
        options,
        format: args.format.map(Into::into),
    };

    let bar = progress_bar(args.no_progress)?;
    let handle = bar.clone();
    let result = run_scan_with_progress(&request, move |progress| {
        handle.set_length(progress.rows_total as u64);
        handle.set_position(progress.rows_done as u64);
    });
    match &result {
        Ok(summary) => bar.finish_with_message(format!("{} pairs", summary.pairs_emitted)),
        Err(_) => bar.abandon(),
    }
    result
}

pub fn run_describe(args: &DescribeArgs) -> Result<()> {
    let description = describe(&args.description)?;
    print_description(&description);
    Ok(())
}

fn progress_bar(disabled: bool) -> Result<ProgressBar> {
    if disabled || !io::stderr().is_terminal() {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)?
            .progress_chars("=>-"),
    );
    Ok(bar)
}
