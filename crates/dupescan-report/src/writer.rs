//! Streaming report writer.

use std::io::Write;

use dupescan_engine::PairMatch;
use tracing::info;

use crate::error::Result;
use crate::format::ReportFormat;
use crate::model::Report;
use crate::{delimited, html, json};

enum Target<W: Write> {
    Html(quick_xml::Writer<W>),
    Csv(csv::Writer<W>),
    Json(W),
}

/// Writes a report one pair at a time.
///
/// [`ReportWriter::new`] writes everything that precedes the pairs, each
/// [`ReportWriter::push`] writes one pair, and [`ReportWriter::finish`]
/// closes the document. Pairs are not kept once written.
pub struct ReportWriter<W: Write> {
    report: Report,
    target: Target<W>,
    pairs: u64,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W, report: Report, format: ReportFormat) -> Result<Self> {
        let target = match format {
            ReportFormat::Html => Target::Html(html::begin(writer, &report)?),
            ReportFormat::Csv => Target::Csv(delimited::begin(writer, &report)?),
            ReportFormat::Json => Target::Json(json::begin(writer, &report)?),
        };
        Ok(Self {
            report,
            target,
            pairs: 0,
        })
    }

    pub fn format(&self) -> ReportFormat {
        match self.target {
            Target::Html(_) => ReportFormat::Html,
            Target::Csv(_) => ReportFormat::Csv,
            Target::Json(_) => ReportFormat::Json,
        }
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Pairs written so far.
    pub fn pairs(&self) -> u64 {
        self.pairs
    }

    pub fn push(&mut self, found: &PairMatch<'_>) -> Result<()> {
        let row = self.report.row(found);
        match &mut self.target {
            Target::Html(xml) => html::write_row(xml, &row)?,
            Target::Csv(csv) => delimited::write_row(csv, &row)?,
            Target::Json(writer) => json::write_row(writer, &row, self.pairs == 0)?,
        }
        self.pairs += 1;
        Ok(())
    }

    /// Close the document, flush, and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        let format = self.format();
        let mut inner = match self.target {
            Target::Html(xml) => html::end(xml, &self.report, self.pairs)?,
            Target::Csv(csv) => delimited::end(csv)?,
            Target::Json(writer) => json::end(writer)?,
        };
        inner.flush()?;
        info!(format = %format, pairs = self.pairs, "report written");
        Ok(inner)
    }
}
