//! End-to-end tests for the scan pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dupescan_cli::pipeline::{ScanRequest, describe, run_scan, run_scan_with_progress};
use dupescan_engine::ScanOptions;
use dupescan_ingest::CsvOptions;
use dupescan_report::ReportFormat;
use tempfile::TempDir;

const DESCRIPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<description>
  <column name="id" id="1"/>
  <column name="first" weight="0.5" matchCase="0" ignoreSpecialCharacters="true"/>
  <column name="last" weight="0.5" matchCase="0" display="1"/>
  <column name="note" weight="0"/>
</description>
"#;

const ROWS: &str = "\
1,Martha,Jones,a
2,Marhta,JONES,b
3,Zoë,Smith,c
4,Zoe,smith,d
5,Xavier,Quinn,e
";

fn fixture(dir: &TempDir, rows: &str) -> (PathBuf, PathBuf) {
    let description = dir.path().join("columns.xml");
    let input = dir.path().join("people.csv");
    std::fs::write(&description, DESCRIPTION).unwrap();
    std::fs::write(&input, rows).unwrap();
    (description, input)
}

fn request(description: &Path, input: &Path, output: PathBuf) -> ScanRequest {
    ScanRequest {
        description: description.to_path_buf(),
        input: input.to_path_buf(),
        output,
        csv: CsvOptions::default(),
        options: ScanOptions::default().with_threshold(0.9).with_threads(0),
        format: None,
    }
}

#[test]
fn scan_writes_csv_report() {
    let dir = TempDir::new().unwrap();
    let (description, input) = fixture(&dir, ROWS);
    let output = dir.path().join("pairs.csv");

    let summary = run_scan(&request(&description, &input, output.clone())).unwrap();

    assert_eq!(summary.records, 5);
    assert_eq!(summary.pairs_evaluated, 10);
    assert_eq!(summary.pairs_emitted, 2);
    assert_eq!(summary.format, ReportFormat::Csv);
    assert_eq!(summary.threads, 0);

    let written = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines[0],
        "id (1),last (1),id (2),last (2),jaro,jaro-winkler,levenshtein,jaccard"
    );
    assert!(lines[1].starts_with("1,Jones,2,JONES,"), "{}", lines[1]);
    // Diacritics stripped and case folded: every metric scores 1.
    assert_eq!(lines[2], "3,Smith,4,smith,1.0000,1.0000,1.0000,1.0000");
    assert_eq!(lines.len(), 3);
}

#[test]
fn parallel_scan_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let (description, input) = fixture(&dir, ROWS);

    let sequential = request(&description, &input, dir.path().join("seq.json"));
    let mut parallel = request(&description, &input, dir.path().join("par.json"));
    parallel.options = parallel.options.clone().with_threads(3);

    run_scan(&sequential).unwrap();
    let summary = run_scan(&parallel).unwrap();
    assert_eq!(summary.threads, 3);

    // Parallel pairs arrive unordered; compare them by position.
    let pairs = |path: &Path| {
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        let mut pairs = json["pairs"].as_array().unwrap().clone();
        pairs.sort_by_key(|pair| {
            (
                pair["left"]["position"].as_u64(),
                pair["right"]["position"].as_u64(),
            )
        });
        pairs
    };
    assert_eq!(
        pairs(&dir.path().join("seq.json")),
        pairs(&dir.path().join("par.json"))
    );
}

#[test]
fn zero_threshold_writes_every_pair() {
    let rows: String = (1..=40).map(|i| format!("{i},F{i},L{i},n\n")).collect();
    for threads in [0, 2] {
        let dir = TempDir::new().unwrap();
        let (description, input) = fixture(&dir, &rows);
        let output = dir.path().join("pairs.csv");
        let mut request = request(&description, &input, output.clone());
        request.options = ScanOptions::default().with_threshold(0.0).with_threads(threads);

        let summary = run_scan(&request).unwrap();
        assert_eq!(summary.pairs_emitted, 40 * 39 / 2);

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 1 + 40 * 39 / 2, "threads = {threads}");
    }
}

#[test]
fn explicit_format_overrides_extension() {
    let dir = TempDir::new().unwrap();
    let (description, input) = fixture(&dir, ROWS);
    let mut request = request(&description, &input, dir.path().join("pairs.txt"));
    request.format = Some(ReportFormat::Html);

    let summary = run_scan(&request).unwrap();
    assert_eq!(summary.format, ReportFormat::Html);
    let written = std::fs::read_to_string(dir.path().join("pairs.txt")).unwrap();
    assert!(written.starts_with("<!DOCTYPE html>"));
}

#[test]
fn progress_reaches_every_row() {
    let dir = TempDir::new().unwrap();
    let (description, input) = fixture(&dir, ROWS);
    let calls = Arc::new(AtomicUsize::new(0));
    let last = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let seen = Arc::clone(&last);
    run_scan_with_progress(
        &request(&description, &input, dir.path().join("pairs.csv")),
        move |progress| {
            assert_eq!(progress.rows_total, 5);
            counter.fetch_add(1, Ordering::SeqCst);
            seen.fetch_max(progress.rows_done, Ordering::SeqCst);
        },
    )
    .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert_eq!(last.load(Ordering::SeqCst), 5);
}

#[test]
fn ragged_row_reports_line() {
    let dir = TempDir::new().unwrap();
    let (description, input) = fixture(&dir, "1,a,b,c\n2,a,b\n");

    let error = run_scan(&request(&description, &input, dir.path().join("out.csv")))
        .unwrap_err();
    let message = format!("{error:#}");
    assert!(message.starts_with("load rows"), "{message}");
    assert!(message.contains("line 2"), "{message}");
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn missing_description_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("people.csv");
    std::fs::write(&input, ROWS).unwrap();

    let error = run_scan(&request(
        &dir.path().join("absent.xml"),
        &input,
        dir.path().join("out.csv"),
    ))
    .unwrap_err();
    assert!(format!("{error:#}").contains("absent.xml"));
}

#[test]
fn describe_loads_columns() {
    let dir = TempDir::new().unwrap();
    let (description, _) = fixture(&dir, ROWS);

    let loaded = describe(&description).unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(loaded.identifier_count(), 1);
    assert_eq!(loaded.scored_count(), 2);
    assert!(loaded.column("first").unwrap().ignore_diacritics());
}
