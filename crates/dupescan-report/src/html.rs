//! HTML report rendering.

use std::fmt::Display;
use std::io::Write;

use dupescan_metrics::MetricKind;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{ReportError, Result};
use crate::model::{Report, ReportRecord, ReportRow};

const STYLE: &str = "
table { border-collapse: collapse; border-spacing: 0; width: 100%; border: 1px solid #ddd; }
th, td { text-align: left; padding: 8px; }
td.score { text-align: right; font-variant-numeric: tabular-nums; }
tr:nth-child(even) { background-color: #f2f2f2; }
";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Page head, summary heading and the table header row.
pub(crate) fn begin<W: Write>(writer: W, report: &Report) -> Result<Writer<W>> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);

    emit(&mut xml, Event::DocType(BytesText::from_escaped("html")))?;
    let mut html = BytesStart::new("html");
    html.push_attribute(("lang", "en"));
    emit(&mut xml, Event::Start(html))?;

    emit(&mut xml, Event::Start(BytesStart::new("head")))?;
    let mut charset = BytesStart::new("meta");
    charset.push_attribute(("charset", "utf-8"));
    emit(&mut xml, Event::Empty(charset))?;
    let mut viewport = BytesStart::new("meta");
    viewport.push_attribute(("name", "viewport"));
    viewport.push_attribute(("content", "width=device-width, initial-scale=1"));
    emit(&mut xml, Event::Empty(viewport))?;
    text_element(&mut xml, "title", "Similar rows")?;
    text_element(&mut xml, "style", STYLE)?;
    emit(&mut xml, Event::End(BytesEnd::new("head")))?;

    emit(&mut xml, Event::Start(BytesStart::new("body")))?;
    text_element(&mut xml, "h2", "Similar rows")?;

    let mut wrapper = BytesStart::new("div");
    wrapper.push_attribute(("style", "overflow-x:auto;"));
    emit(&mut xml, Event::Start(wrapper))?;
    emit(&mut xml, Event::Start(BytesStart::new("table")))?;

    emit(&mut xml, Event::Start(BytesStart::new("tr")))?;
    for side in 1..=2 {
        for column in &report.columns {
            text_element(&mut xml, "th", &format!("{column} ({side})"))?;
        }
    }
    for kind in MetricKind::ALL {
        text_element(&mut xml, "th", kind.label())?;
    }
    emit(&mut xml, Event::End(BytesEnd::new("tr")))?;
    Ok(xml)
}

/// One table row; scores are shown as percentages with two decimals.
pub(crate) fn write_row<W: Write>(xml: &mut Writer<W>, row: &ReportRow<'_>) -> Result<()> {
    emit(xml, Event::Start(BytesStart::new("tr")))?;
    write_values(xml, &row.left)?;
    write_values(xml, &row.right)?;
    for (_, score) in row.scores.iter() {
        let mut cell = BytesStart::new("td");
        cell.push_attribute(("class", "score"));
        emit(xml, Event::Start(cell))?;
        emit(
            xml,
            Event::Text(BytesText::new(&format!("{:.2}", score * 100.0))),
        )?;
        emit(xml, Event::End(BytesEnd::new("td")))?;
    }
    emit(xml, Event::End(BytesEnd::new("tr")))
}

/// Close the table and the page, stating the pair count and the timestamp.
pub(crate) fn end<W: Write>(mut xml: Writer<W>, report: &Report, pairs: u64) -> Result<W> {
    emit(&mut xml, Event::End(BytesEnd::new("table")))?;
    emit(&mut xml, Event::End(BytesEnd::new("div")))?;
    let metrics = report
        .metrics
        .iter()
        .copied()
        .map(MetricKind::label)
        .collect::<Vec<_>>()
        .join(", ");
    text_element(
        &mut xml,
        "p",
        &format!(
            "{pairs} pairs at or above {:.2} % ({metrics})",
            report.threshold * 100.0
        ),
    )?;
    text_element(
        &mut xml,
        "p",
        &format!(
            "Generated {}",
            report.generated_at.format(TIMESTAMP_FORMAT)
        ),
    )?;
    emit(&mut xml, Event::End(BytesEnd::new("body")))?;
    emit(&mut xml, Event::End(BytesEnd::new("html")))?;

    let mut inner = xml.into_inner();
    inner.write_all(b"\n").map_err(html_error)?;
    Ok(inner)
}

fn write_values<W: Write>(xml: &mut Writer<W>, record: &ReportRecord<'_>) -> Result<()> {
    for value in &record.values {
        text_element(xml, "td", value)?;
    }
    Ok(())
}

fn text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    emit(xml, Event::Start(BytesStart::new(name)))?;
    emit(xml, Event::Text(BytesText::new(text)))?;
    emit(xml, Event::End(BytesEnd::new(name)))
}

fn emit<W: Write>(xml: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    xml.write_event(event).map_err(html_error)
}

fn html_error(error: impl Display) -> ReportError {
    ReportError::Html {
        message: error.to_string(),
    }
}
