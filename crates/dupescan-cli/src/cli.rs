//! CLI argument definitions for dupescan.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use dupescan_engine::DEFAULT_THRESHOLD;
use dupescan_metrics::MetricKind;
use dupescan_report::ReportFormat;

#[derive(Parser)]
#[command(
    name = "dupescan",
    version,
    about = "Find near-duplicate rows in a delimited file",
    long_about = "Find near-duplicate rows in a delimited file.\n\n\
                  Every pair of rows is compared column by column with four string\n\
                  metrics (Jaro, Jaro-Winkler, Levenshtein, Jaccard), weighted as the\n\
                  XML column description says. Pairs reaching the threshold on any\n\
                  selected metric are written to an HTML, CSV or JSON report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Allow field values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare every pair of rows and write the similar ones to a report.
    Scan(ScanArgs),

    /// Print the columns of a description file.
    Describe(DescribeArgs),
}

#[derive(Parser)]
pub struct ScanArgs {
    /// XML file describing the columns.
    #[arg(long, short = 'd', value_name = "FILE")]
    pub description: PathBuf,

    /// Delimited file with one record per line.
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: PathBuf,

    /// Report file to write.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// Field delimiter: a single ASCII character, or `tab`.
    #[arg(long, value_name = "CHAR", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Treat the first line as a header and skip it.
    #[arg(long = "has-header")]
    pub has_header: bool,

    /// Minimum similarity in [0, 1] for a pair to be reported.
    #[arg(
        long = "min-similarity",
        value_name = "SCORE",
        default_value_t = DEFAULT_THRESHOLD,
        value_parser = parse_threshold
    )]
    pub min_similarity: f64,

    /// Metric that may trigger a match; repeat to select several (default: all).
    #[arg(long = "metric", value_name = "NAME", value_parser = parse_metric)]
    pub metrics: Vec<MetricKind>,

    /// Report format (default: from the output extension, else html).
    #[arg(long = "format", value_enum)]
    pub format: Option<ReportFormatArg>,

    /// Worker threads; 0 scans sequentially (default: $DUPESCAN_THREADS or all cores).
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Hide the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

#[derive(Parser)]
pub struct DescribeArgs {
    /// XML file describing the columns.
    #[arg(long, short = 'd', value_name = "FILE")]
    pub description: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Html,
    Csv,
    Json,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(value: ReportFormatArg) -> Self {
        match value {
            ReportFormatArg::Html => ReportFormat::Html,
            ReportFormatArg::Csv => ReportFormat::Csv,
            ReportFormatArg::Json => ReportFormat::Json,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match value.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!(
                "delimiter must be a single ASCII character, got `{value}`"
            )),
        },
    }
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!("similarity must be within [0, 1], got {threshold}"))
    }
}

fn parse_metric(value: &str) -> Result<MetricKind, String> {
    value.parse().map_err(|error| format!("{error}"))
}
