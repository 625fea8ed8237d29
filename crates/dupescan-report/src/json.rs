//! JSON report rendering.
//!
//! The document is written field by field so that pairs can be appended one
//! at a time: the header fields first, then one `pairs` element per line.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::model::{Report, ReportRow};

pub(crate) fn begin<W: Write>(mut writer: W, report: &Report) -> Result<W> {
    writer.write_all(b"{")?;
    field(&mut writer, "generated_at", &report.generated_at)?;
    field(&mut writer, "threshold", &report.threshold)?;
    field(&mut writer, "metrics", &report.metrics)?;
    field(&mut writer, "columns", &report.columns)?;
    writer.write_all(b"\"pairs\":[")?;
    Ok(writer)
}

pub(crate) fn write_row<W: Write>(writer: &mut W, row: &ReportRow<'_>, first: bool) -> Result<()> {
    writer.write_all(if first { b"\n" } else { b",\n" })?;
    serde_json::to_writer(&mut *writer, row)?;
    Ok(())
}

pub(crate) fn end<W: Write>(mut writer: W) -> Result<W> {
    writer.write_all(b"\n]}\n")?;
    Ok(writer)
}

fn field<W: Write, T: Serialize + ?Sized>(writer: &mut W, name: &str, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *writer, name)?;
    writer.write_all(b":")?;
    serde_json::to_writer(&mut *writer, value)?;
    writer.write_all(b",")?;
    Ok(())
}
