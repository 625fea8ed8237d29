//! Delimited row reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use csv::{ReaderBuilder, StringRecord, Trim};
use dupescan_model::{Dataset, DatasetDescription, ModelError, Record};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::options::CsvOptions;

const BOM: char = '\u{feff}';

/// Check a file's size against `max_size` before loading it.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::file_read(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Load every row of a delimited file into a dataset.
///
/// Values are kept verbatim. A row whose width differs from the column
/// count aborts the load with its line number.
pub fn load_dataset(
    path: &Path,
    description: DatasetDescription,
    options: &CsvOptions,
) -> Result<Dataset> {
    check_file_size(path, options.max_file_size)?;
    let file = File::open(path).map_err(|e| IngestError::file_read(path, e))?;
    let start = Instant::now();
    let dataset = read_dataset(file, path, description, options)?;
    info!(
        path = %path.display(),
        records = dataset.len(),
        pairs = dataset.pair_count(),
        duration_ms = start.elapsed().as_millis(),
        "rows loaded"
    );
    Ok(dataset)
}

/// Read rows from any reader; `source` names the input in errors.
pub fn read_dataset<R: Read>(
    reader: R,
    source: &Path,
    description: DatasetDescription,
    options: &CsvOptions,
) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(reader);

    if options.has_header {
        let headers = reader.headers().map_err(|e| IngestError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        debug!(columns = headers.len(), "header row skipped");
    }

    let mut dataset = Dataset::new(description);
    let mut row = StringRecord::new();
    let mut first = true;
    loop {
        let more = reader.read_record(&mut row).map_err(|e| IngestError::Csv {
            path: source.to_path_buf(),
            source: e,
        })?;
        if !more {
            break;
        }
        let line = row.position().map_or(0, csv::Position::line);
        let record = to_record(&row, first && !options.has_header);
        first = false;

        dataset.push(record).map_err(|e| match e {
            ModelError::ArityMismatch {
                position,
                expected,
                found,
            } => IngestError::ArityMismatch {
                path: source.to_path_buf(),
                line,
                position,
                expected,
                found,
            },
            other => IngestError::Model {
                path: source.to_path_buf(),
                source: other,
            },
        })?;
    }
    Ok(dataset)
}

fn to_record(row: &StringRecord, strip_bom: bool) -> Record {
    row.iter()
        .enumerate()
        .map(|(index, value)| {
            if strip_bom && index == 0 {
                value.trim_start_matches(BOM)
            } else {
                value
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use dupescan_model::ColumnSpec;

    use super::*;

    fn description() -> DatasetDescription {
        DatasetDescription::new(vec![
            ColumnSpec::identifier("id").unwrap(),
            ColumnSpec::comparable("name", 1.0).unwrap(),
        ])
        .unwrap()
    }

    fn read(input: &str, options: &CsvOptions) -> Result<Dataset> {
        read_dataset(input.as_bytes(), Path::new("rows.csv"), description(), options)
    }

    #[test]
    fn keeps_values_verbatim() {
        let dataset = read("1, Martha \n2,\"MAR,HTA\"\n3,\n", &CsvOptions::default()).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[0].get(1), Some(" Martha "));
        assert_eq!(dataset.records()[1].get(1), Some("MAR,HTA"));
        assert_eq!(dataset.records()[2].get(1), Some(""));
    }

    #[test]
    fn honours_delimiter_and_header() {
        let options = CsvOptions::default().with_delimiter(b';').with_header(true);
        let dataset = read("id;name\n1;MARTHA\n2;MARHTA\n", &options).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].get(1), Some("MARTHA"));
    }

    #[test]
    fn strips_leading_bom() {
        let dataset = read("\u{feff}1,MARTHA\n", &CsvOptions::default()).unwrap();
        assert_eq!(dataset.records()[0].get(0), Some("1"));
    }

    #[test]
    fn reports_line_of_short_row() {
        let err = read("1,MARTHA\n2\n3,MARHTA\n", &CsvOptions::default()).unwrap_err();
        match err {
            IngestError::ArityMismatch {
                line,
                position,
                expected,
                found,
                ..
            } => {
                assert_eq!((line, position, expected, found), (2, 1, 2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_shifts_reported_line() {
        let options = CsvOptions::default().with_header(true);
        let err = read("id,name\n1,MARTHA,extra\n", &options).unwrap_err();
        assert!(matches!(
            err,
            IngestError::ArityMismatch {
                line: 2,
                position: 0,
                found: 3,
                ..
            }
        ));
    }
}
