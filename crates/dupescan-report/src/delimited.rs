//! CSV report rendering.
//!
//! Values of the first record come first, suffixed ` (1)` in the header,
//! then those of the second record, then the four scores with four decimals.

use std::io::Write;

use dupescan_metrics::MetricKind;

use crate::error::{ReportError, Result};
use crate::model::{Report, ReportRow};

pub(crate) fn begin<W: Write>(writer: W, report: &Report) -> Result<csv::Writer<W>> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = Vec::with_capacity(report.columns.len() * 2 + 4);
    for side in 1..=2 {
        header.extend(report.columns.iter().map(|column| format!("{column} ({side})")));
    }
    header.extend(MetricKind::ALL.iter().map(|kind| kind.name().to_string()));
    csv.write_record(&header)?;
    Ok(csv)
}

pub(crate) fn write_row<W: Write>(csv: &mut csv::Writer<W>, row: &ReportRow<'_>) -> Result<()> {
    for value in row.left.values.iter().chain(&row.right.values) {
        csv.write_field(value)?;
    }
    for (_, score) in row.scores.iter() {
        csv.write_field(format!("{score:.4}"))?;
    }
    csv.write_record(None::<&[u8]>)?;
    Ok(())
}

pub(crate) fn end<W: Write>(csv: csv::Writer<W>) -> Result<W> {
    csv.into_inner()
        .map_err(|error| ReportError::Write(error.into_error()))
}
