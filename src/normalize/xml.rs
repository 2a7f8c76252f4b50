//! XML payload normalization.
//!
//! The total comes from the first `totalCnt` element anywhere in the
//! document. Every `row` element becomes a row; each direct child element
//! contributes `tag -> text content`, unless the text is blank after trimming.

use std::borrow::Cow;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::parse_count;
use crate::config::DataFormat;
use crate::error_handling::FetchError;
use crate::models::{ResultSet, Row};

fn decode_error(message: impl ToString) -> FetchError {
    FetchError::Decode {
        format: DataFormat::Xml,
        message: message.to_string(),
    }
}

/// A `row` element being collected.
struct OpenRow {
    depth: usize,
    row: Row,
    /// Direct child currently open: tag name and accumulated text content
    field: Option<(String, String)>,
}

/// Text collected from the first `totalCnt` element.
struct OpenTotal {
    depth: usize,
    text: String,
}

/// Parses an XML body into rows and the upstream total.
///
/// # Errors
///
/// `FetchError::Decode` when the document is not well-formed.
pub(crate) fn normalize_xml(body: &str) -> Result<ResultSet, FetchError> {
    let mut reader = Reader::from_str(body);

    let mut depth = 0usize;
    let mut rows = Vec::new();
    let mut open_row: Option<OpenRow> = None;
    let mut open_total: Option<OpenTotal> = None;
    let mut total: Option<usize> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if let Some(current) = open_row.as_mut() {
                    if depth == current.depth + 1 {
                        current.field = Some((name, String::new()));
                    }
                } else if name == "row" {
                    open_row = Some(OpenRow {
                        depth,
                        row: Row::new(),
                        field: None,
                    });
                } else if name == "totalCnt" && total.is_none() && open_total.is_none() {
                    open_total = Some(OpenTotal {
                        depth,
                        text: String::new(),
                    });
                }
            }
            Ok(Event::Empty(e)) => {
                // A self-closing element has no text: empty fields are omitted,
                // an empty totalCnt reads as 0, an empty row is still a row.
                let name = e.name();
                let name = name.as_ref();
                if open_row.is_none() {
                    if name == b"row" {
                        rows.push(Row::new());
                    } else if name == b"totalCnt" && total.is_none() && open_total.is_none() {
                        total = Some(0);
                    }
                }
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(decode_error)?;
                append_text(&mut open_row, &mut open_total, &text);
            }
            Ok(Event::CData(c)) => {
                let text = String::from_utf8_lossy(c.as_ref());
                append_text(&mut open_row, &mut open_total, &text);
            }
            Ok(Event::End(_)) => {
                if let Some(mut current) = open_row.take() {
                    if depth == current.depth {
                        rows.push(current.row);
                    } else {
                        if depth == current.depth + 1 {
                            if let Some((name, text)) = current.field.take() {
                                if !text.trim().is_empty() {
                                    current.row.insert(name, text);
                                }
                            }
                        }
                        open_row = Some(current);
                    }
                } else if open_total.as_ref().is_some_and(|t| t.depth == depth) {
                    if let Some(done) = open_total.take() {
                        total = Some(parse_count(&done.text));
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(decode_error(format!(
                    "{} at position {}",
                    e,
                    reader.error_position()
                )))
            }
            Ok(_) => {}
        }
    }

    Ok(ResultSet {
        rows,
        total_count: total.unwrap_or(0),
    })
}

fn append_text(open_row: &mut Option<OpenRow>, open_total: &mut Option<OpenTotal>, text: &Cow<'_, str>) {
    if let Some((_, value)) = open_row.as_mut().and_then(|r| r.field.as_mut()) {
        value.push_str(text);
    } else if let Some(total) = open_total.as_mut() {
        total.text.push_str(text);
    }
}
