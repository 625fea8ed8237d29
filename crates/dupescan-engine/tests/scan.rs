use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dupescan_engine::{CancelToken, PairScanner, ScanError, ScanOptions};
use dupescan_metrics::{MetricKind, MetricScores, jaro};
use dupescan_model::{ColumnSpec, DatasetDescription, ModelError, Record};

fn truncate3(value: f64) -> f64 {
    (value * 1000.0).floor() / 1000.0
}

fn names_description() -> DatasetDescription {
    DatasetDescription::new(vec![
        ColumnSpec::identifier("id").unwrap(),
        ColumnSpec::comparable("name", 1.0).unwrap(),
    ])
    .unwrap()
}

fn name_rows(names: &[&str]) -> Vec<Record> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| Record::from_iter([(index + 1).to_string(), (*name).to_string()]))
        .collect()
}

const NAMES: [&str; 12] = [
    "MARTHA", "MARHTA", "ZZZZZ", "DWAYNE", "DUANE", "DIXON", "DICKSONX", "JELLYFISH",
    "SMELLYFISH", "MARTA", "", "DWAYNE",
];

#[test]
fn martha_scenario_emits_only_the_close_pair() {
    let options = ScanOptions::default().with_threshold(0.9);
    let scanner =
        PairScanner::from_records(names_description(), name_rows(&["MARTHA", "MARHTA", "ZZZZZ"]), options)
            .unwrap();

    let matches: Vec<_> = scanner.pairs().collect::<Result<_, _>>().unwrap();
    assert_eq!(matches.len(), 1);
    let found = &matches[0];
    assert_eq!(found.key(), (0, 1));
    assert_eq!(found.left_record.get(0), Some("1"));
    assert_eq!(found.right_record.get(0), Some("2"));
    assert_eq!(truncate3(found.scores.jaro), 0.944);
    assert_eq!(truncate3(found.scores.jaro_winkler), 0.961);
    assert_eq!(found.metric, MetricKind::JaroWinkler);
}

#[test]
fn zero_threshold_visits_every_pair_once() {
    let n = NAMES.len();
    let scanner = PairScanner::from_records(
        names_description(),
        name_rows(&NAMES),
        ScanOptions::default().with_threshold(0.0),
    )
    .unwrap();

    let keys: Vec<_> = scanner.pairs().map(|m| m.unwrap().key()).collect();
    assert_eq!(keys.len(), n * (n - 1) / 2);
    let unique: BTreeSet<_> = keys.iter().copied().collect();
    assert_eq!(unique.len(), keys.len());
    assert!(keys.iter().all(|(left, right)| left < right && *right < n));
}

#[test]
fn zero_weight_column_does_not_affect_scores() {
    let description = DatasetDescription::new(vec![
        ColumnSpec::identifier("id").unwrap(),
        ColumnSpec::comparable("name", 1.0).unwrap(),
        ColumnSpec::comparable("notes", 0.0).unwrap(),
    ])
    .unwrap();
    let rows = vec![
        Record::from_iter(["1", "DIXON", "first note"]),
        Record::from_iter(["2", "DICKSONX", "something else entirely"]),
    ];
    let scanner =
        PairScanner::from_records(description, rows, ScanOptions::default().with_threshold(0.0))
            .unwrap();

    let evaluation = scanner.evaluate(0, 1).unwrap();
    assert_eq!(evaluation.scores, MetricScores::compute("DIXON", "DICKSONX"));
    assert_eq!(evaluation.scores.jaro, jaro("DIXON", "DICKSONX"));
}

#[test]
fn values_equal_after_normalization_score_one() {
    let description = DatasetDescription::new(vec![
        ColumnSpec::identifier("id").unwrap(),
        ColumnSpec::comparable("name", 0.7)
            .unwrap()
            .with_match_case(false)
            .with_ignore_diacritics(true),
        ColumnSpec::comparable("city", 0.3)
            .unwrap()
            .with_match_case(false),
    ])
    .unwrap();
    let rows = vec![
        Record::from_iter(["1", "Hélène", "Saint-Étienne"]),
        Record::from_iter(["2", "HELENE", "SAINT-ÉTIENNE"]),
    ];
    let scanner =
        PairScanner::from_records(description, rows, ScanOptions::default()).unwrap();

    assert_eq!(scanner.evaluate(0, 1).unwrap().scores, MetricScores::uniform(1.0));
}

#[test]
fn threshold_applies_to_selected_metrics_only() {
    // DWAYNE/DUANE: Jaro-Winkler 0.84, Jaccard 0.125.
    let rows = name_rows(&["DWAYNE", "DUANE"]);
    let jaccard_only = ScanOptions::default()
        .with_threshold(0.5)
        .with_metrics(vec![MetricKind::Jaccard]);
    let scanner = PairScanner::from_records(names_description(), rows.clone(), jaccard_only).unwrap();
    assert_eq!(scanner.pairs().count(), 0);

    let winkler_only = ScanOptions::default()
        .with_threshold(0.5)
        .with_metrics(vec![MetricKind::JaroWinkler]);
    let scanner = PairScanner::from_records(names_description(), rows, winkler_only).unwrap();
    let found = scanner.pairs().next().unwrap().unwrap();
    assert_eq!(found.metric, MetricKind::JaroWinkler);
    assert_eq!(truncate3(found.score), 0.84);
}

#[test]
fn arity_mismatch_reports_position() {
    let rows = vec![
        Record::from_iter(["1", "MARTHA"]),
        Record::from_iter(["2"]),
        Record::from_iter(["3", "MARHTA"]),
    ];
    let err =
        PairScanner::from_records(names_description(), rows, ScanOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ScanError::Model(ModelError::ArityMismatch {
            position: 1,
            expected: 2,
            found: 1
        })
    ));
    assert_eq!(err.position(), Some(1));
}

#[test]
fn parallel_scan_matches_sequential_scan() {
    let options = ScanOptions::default().with_threshold(0.5);
    let sequential =
        PairScanner::from_records(names_description(), name_rows(&NAMES), options.clone()).unwrap();
    let parallel = PairScanner::from_records(
        names_description(),
        name_rows(&NAMES),
        options.with_threads(3),
    )
    .unwrap();

    let expected = sequential.scan().unwrap();
    let mut unordered = parallel.scan_parallel().unwrap();
    unordered.matches.sort_by_key(|m| m.key());
    assert_eq!(unordered.stats, expected.stats);
    assert_eq!(
        unordered.matches.iter().map(|m| (m.key(), m.scores)).collect::<Vec<_>>(),
        expected.matches.iter().map(|m| (m.key(), m.scores)).collect::<Vec<_>>()
    );

    let ordered = parallel.scan().unwrap();
    assert!(ordered.matches.windows(2).all(|w| w[0].key() < w[1].key()));
    assert_eq!(ordered.stats.pairs_evaluated, 66);
}

#[test]
fn progress_reports_every_row() {
    let seen = Arc::new(AtomicUsize::new(0));
    let calls = Arc::new(AtomicUsize::new(0));
    let (seen_in, calls_in) = (Arc::clone(&seen), Arc::clone(&calls));
    let scanner = PairScanner::from_records(
        names_description(),
        name_rows(&NAMES),
        ScanOptions::default(),
    )
    .unwrap()
    .with_progress(move |done| {
        seen_in.fetch_max(done, Ordering::SeqCst);
        calls_in.fetch_add(1, Ordering::SeqCst);
    });

    scanner.scan().unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), NAMES.len());
    assert_eq!(calls.load(Ordering::SeqCst), NAMES.len());
}

#[test]
fn cancelling_mid_scan_stops_sequential_iteration() {
    let token = CancelToken::new();
    let trigger = token.clone();
    let scanner = PairScanner::from_records(
        names_description(),
        name_rows(&NAMES),
        ScanOptions::default().with_threshold(0.0),
    )
    .unwrap()
    .with_cancel_token(token)
    .with_progress(move |done| {
        if done == 2 {
            trigger.cancel();
        }
    });

    let results: Vec<_> = scanner.pairs().collect();
    let last = results.last().unwrap();
    assert!(matches!(last, Err(ScanError::Cancelled { position: 2 })));
    // Rows 0 and 1 completed before the checkpoint.
    let n = NAMES.len();
    assert_eq!(results.len() - 1, (n - 1) + (n - 2));
    assert!(matches!(
        scanner.scan(),
        Err(ScanError::Cancelled { position: 0 })
    ));
}

#[test]
fn cancelling_stops_parallel_scan() {
    let names: Vec<String> = (0..64).map(|i| format!("NAME{i:03}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let token = CancelToken::new();
    let trigger = token.clone();
    let scanner = PairScanner::from_records(
        names_description(),
        name_rows(&refs),
        ScanOptions::default().with_threads(2),
    )
    .unwrap()
    .with_cancel_token(token)
    .with_progress(move |_| trigger.cancel());

    let err = scanner.scan_parallel().unwrap_err();
    assert!(matches!(err, ScanError::Cancelled { .. }));
}

fn numbered_scanner(rows: usize, threads: usize) -> PairScanner {
    let names: Vec<String> = (0..rows).map(|i| format!("NAME{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    PairScanner::from_records(
        names_description(),
        name_rows(&refs),
        ScanOptions::default().with_threshold(0.0).with_threads(threads),
    )
    .unwrap()
}

#[test]
fn sink_sees_every_match_without_collecting() {
    for threads in [0, 1, 4] {
        let scanner = numbered_scanner(120, threads);
        let mut count = 0u64;
        let mut keys_sum = 0usize;
        let stats = scanner
            .scan_with(|found| {
                count += 1;
                keys_sum += found.left + found.right;
                Ok::<_, ScanError>(())
            })
            .unwrap();

        let expected = 120 * 119 / 2;
        assert_eq!(count, expected, "threads = {threads}");
        assert_eq!(stats.pairs_emitted, expected);
        assert_eq!(stats.pairs_evaluated, expected);
        // Each position appears in 119 pairs.
        assert_eq!(keys_sum, 119 * (0..120).sum::<usize>());
    }
}

#[test]
fn sequential_sink_receives_pairs_in_order() {
    let scanner = numbered_scanner(20, 0);
    let mut last = None;
    scanner
        .scan_with(|found| {
            assert!(last < Some(found.key()));
            last = Some(found.key());
            Ok::<_, ScanError>(())
        })
        .unwrap();
    assert_eq!(last, Some((18, 19)));
}

#[derive(Debug)]
enum SinkError {
    Full,
    Scan(ScanError),
}

impl From<ScanError> for SinkError {
    fn from(error: ScanError) -> Self {
        Self::Scan(error)
    }
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => f.write_str("sink full"),
            Self::Scan(error) => write!(f, "{error}"),
        }
    }
}

#[test]
fn sink_error_stops_the_parallel_scan() {
    let scanner = numbered_scanner(400, 3);
    let mut seen = 0;
    let result = scanner.scan_with(|_| {
        seen += 1;
        if seen == 5 { Err(SinkError::Full) } else { Ok(()) }
    });
    let error = result.unwrap_err();
    assert!(matches!(error, SinkError::Full), "{error}");
    assert_eq!(seen, 5);
}
