//! XML description loading.
//!
//! A description file lists one `<column>` element per field, in field
//! order:
//!
//! ```xml
//! <description>
//!   <columns>
//!     <column name="id" id="1" display="1" description="Customer id"/>
//!     <column name="name" weight="0.8" matchCase="0" ignoreSpecialCharacters="1"/>
//!   </columns>
//! </description>
//! ```

use std::path::Path;

use dupescan_model::{ColumnSpec, DatasetDescription, ModelError};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use tracing::info;

use crate::error::{IngestError, Result};

const ROOT_ELEMENT: &[u8] = b"description";
const COLUMN_ELEMENT: &[u8] = b"column";

/// Load and validate a description file.
pub fn load_description(path: &Path) -> Result<DatasetDescription> {
    let xml = std::fs::read_to_string(path).map_err(|e| IngestError::file_read(path, e))?;
    let description = parse_description(&xml, path)?;
    info!(
        path = %path.display(),
        columns = description.len(),
        identifiers = description.identifier_count(),
        scored = description.scored_count(),
        "description loaded"
    );
    Ok(description)
}

/// Parse description XML; `source` names the input in errors.
pub fn parse_description(xml: &str, source: &Path) -> Result<DatasetDescription> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut seen_root = false;
    let mut columns = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(source, e.to_string()))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = e.name();
                if !seen_root {
                    if name.as_ref() != ROOT_ELEMENT {
                        return Err(xml_error(
                            source,
                            format!(
                                "expected <description> root element, found <{}>",
                                String::from_utf8_lossy(name.as_ref())
                            ),
                        ));
                    }
                    seen_root = true;
                } else if name.as_ref() == COLUMN_ELEMENT {
                    columns.push(parse_column(e, columns.len() + 1, source)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(xml_error(source, "document is empty".to_string()));
    }

    DatasetDescription::new(columns).map_err(|e| IngestError::Model {
        path: source.to_path_buf(),
        source: e,
    })
}

#[derive(Default)]
struct ColumnAttributes {
    name: Option<String>,
    identifier: Option<String>,
    displayed: Option<String>,
    match_case: Option<String>,
    ignore_diacritics: Option<String>,
    weight: Option<String>,
    description: Option<String>,
}

fn parse_column(element: &BytesStart<'_>, index: usize, source: &Path) -> Result<ColumnSpec> {
    let mut attrs = ColumnAttributes::default();
    for attr in element.attributes() {
        let attr = attr.map_err(|e| xml_error(source, e.to_string()))?;
        let raw = std::str::from_utf8(&attr.value).map_err(|e| xml_error(source, e.to_string()))?;
        let value = unescape(raw)
            .map_err(|e| xml_error(source, e.to_string()))?
            .into_owned();
        let slot = match attr.key.as_ref() {
            b"name" => &mut attrs.name,
            b"id" => &mut attrs.identifier,
            b"display" => &mut attrs.displayed,
            b"matchCase" => &mut attrs.match_case,
            b"ignoreSpecialCharacters" | b"ignoreDiacritics" => &mut attrs.ignore_diacritics,
            b"weight" => &mut attrs.weight,
            b"description" => &mut attrs.description,
            _ => continue,
        };
        *slot = Some(value);
    }

    let name = attrs.name.ok_or_else(|| IngestError::MissingAttribute {
        path: source.to_path_buf(),
        index,
        attribute: "name",
    })?;
    let flag = |attribute: &str, value: Option<&String>| -> Result<Option<bool>> {
        value
            .map(|value| {
                parse_bool(value).ok_or_else(|| IngestError::InvalidAttribute {
                    path: source.to_path_buf(),
                    column: name.clone(),
                    attribute: attribute.to_string(),
                    value: value.clone(),
                })
            })
            .transpose()
    };

    let identifier = flag("id", attrs.identifier.as_ref())?.unwrap_or(false);
    let displayed = flag("display", attrs.displayed.as_ref())?;
    let match_case = flag("matchCase", attrs.match_case.as_ref())?;
    let ignore_diacritics = flag("ignoreSpecialCharacters", attrs.ignore_diacritics.as_ref())?;

    let model_error = |e: ModelError| IngestError::Model {
        path: source.to_path_buf(),
        source: e,
    };
    let mut column = if identifier {
        ColumnSpec::identifier(name.clone()).map_err(model_error)?
    } else {
        let weight = match attrs.weight.as_deref().map(str::trim) {
            None | Some("") => 0.0,
            Some(raw) => raw
                .parse::<f64>()
                .map_err(|_| IngestError::InvalidAttribute {
                    path: source.to_path_buf(),
                    column: name.clone(),
                    attribute: "weight".to_string(),
                    value: raw.to_string(),
                })?,
        };
        ColumnSpec::comparable(name.clone(), weight).map_err(model_error)?
    };

    if let Some(displayed) = displayed {
        column = column.with_displayed(displayed);
    }
    if let Some(match_case) = match_case {
        column = column.with_match_case(match_case);
    }
    if let Some(ignore_diacritics) = ignore_diacritics {
        column = column.with_ignore_diacritics(ignore_diacritics);
    }
    if let Some(description) = attrs.description.filter(|d| !d.trim().is_empty()) {
        column = column.with_description(description);
    }
    Ok(column)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn xml_error(source: &Path, message: String) -> IngestError {
    IngestError::Xml {
        path: source.to_path_buf(),
        message,
    }
}
