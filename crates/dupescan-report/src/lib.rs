//! Reports of duplicate pairs.
//!
//! A [`Report`] holds what is known before the first pair: the shown
//! columns, the threshold and the selected metrics. A [`ReportWriter`] then
//! renders pairs as HTML, CSV or JSON one at a time, as the scanner finds
//! them.

mod delimited;
mod error;
mod format;
mod html;
mod json;
mod model;
mod writer;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use dupescan_engine::PairMatch;
use tracing::debug;

pub use error::{ReportError, Result};
pub use format::ReportFormat;
pub use model::{Report, ReportRecord, ReportRow};
pub use writer::ReportWriter;

/// Render `matches` to `writer` in `format` and return the writer.
pub fn render<'m, 'r: 'm, W, I>(
    writer: W,
    report: Report,
    format: ReportFormat,
    matches: I,
) -> Result<W>
where
    W: Write,
    I: IntoIterator<Item = &'m PairMatch<'r>>,
{
    let mut out = ReportWriter::new(writer, report, format)?;
    for found in matches {
        out.push(found)?;
    }
    out.finish()
}

/// Create the report file at `path`, creating parent directories, and
/// write everything that precedes the pairs.
pub fn create_report(
    path: &Path,
    report: Report,
    format: ReportFormat,
) -> Result<ReportWriter<BufWriter<File>>> {
    let io_error = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = File::create(path).map_err(io_error)?;
    debug!(path = %path.display(), format = %format, "report created");
    ReportWriter::new(BufWriter::new(file), report, format)
}
