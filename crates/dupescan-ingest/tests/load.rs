use std::fs;

use dupescan_ingest::{CsvOptions, IngestError, load_dataset, load_description};
use tempfile::TempDir;

const DESCRIPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<description>
  <columns>
    <column name="id" id="1" display="1"/>
    <column name="name" weight="1" matchCase="0" ignoreSpecialCharacters="1"/>
    <column name="city" weight="0.5" display="1"/>
  </columns>
</description>
"#;

fn fixture(rows: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("description.xml"), DESCRIPTION).unwrap();
    fs::write(dir.path().join("rows.csv"), rows).unwrap();
    dir
}

#[test]
fn loads_description_and_rows() {
    let dir = fixture("1,Hélène,Lyon\n2,HELENE,Lyon\n3,Marc,\n");
    let description = load_description(&dir.path().join("description.xml")).unwrap();
    assert_eq!(description.len(), 3);
    assert_eq!(description.display_columns(), vec![0, 2]);

    let dataset = load_dataset(
        &dir.path().join("rows.csv"),
        description,
        &CsvOptions::default(),
    )
    .unwrap();
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.pair_count(), 3);
    assert_eq!(dataset.records()[2].get(2), Some(""));
}

#[test]
fn reports_missing_files() {
    let dir = fixture("");
    let err = load_description(&dir.path().join("absent.xml")).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));

    let description = load_description(&dir.path().join("description.xml")).unwrap();
    let err = load_dataset(
        &dir.path().join("absent.csv"),
        description,
        &CsvOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn rejects_oversized_input() {
    let dir = fixture("1,A,B\n2,C,D\n");
    let description = load_description(&dir.path().join("description.xml")).unwrap();
    let err = load_dataset(
        &dir.path().join("rows.csv"),
        description,
        &CsvOptions::default().with_max_file_size(4),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        IngestError::FileTooLarge {
            size: 12,
            max_size: 4,
            ..
        }
    ));
}

#[test]
fn arity_error_names_file_and_line() {
    let dir = fixture("1,A,B\n2,C,D\n3,E\n");
    let description = load_description(&dir.path().join("description.xml")).unwrap();
    let path = dir.path().join("rows.csv");
    let err = load_dataset(&path, description, &CsvOptions::default()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 3"), "{message}");
    assert!(message.contains("rows.csv"), "{message}");
}
