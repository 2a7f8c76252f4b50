//! Response normalization.
//!
//! Turns a raw upstream body (JSON or XML) into an ordered list of rows plus
//! the upstream total count. Rows without a `ROW_NUM` get their 1-based
//! position in the parsed sequence.

mod json;
mod xml;

use crate::config::{DataFormat, ROW_NUM_FIELD};
use crate::error_handling::FetchError;
use crate::models::ResultSet;

/// Normalizes a response body of the declared format.
///
/// `dataset_key` is the grid id the JSON keyed envelope is named after.
///
/// # Errors
///
/// - `FetchError::Decode` when the body is not well-formed JSON/XML
/// - `FetchError::Api` when a JSON payload carries a failure `result.code`
///
/// A payload of unknown shape is not an error: it yields zero rows.
///
/// # Example
///
/// ```
/// use agri_open_data::{normalize, DataFormat};
///
/// let body = r#"{"totalCnt": 1, "row": {"KOREAN_NM": "가공업체"}}"#;
/// let result = normalize(body, DataFormat::Json, "Grid_20210909000000000613_1").unwrap();
/// assert_eq!(result.total_count, 1);
/// assert_eq!(result.rows[0].text("ROW_NUM").as_deref(), Some("1"));
/// ```
pub fn normalize(
    body: &str,
    format: DataFormat,
    dataset_key: &str,
) -> Result<ResultSet, FetchError> {
    let mut result = match format {
        DataFormat::Json => json::normalize_json(body, dataset_key)?,
        DataFormat::Xml => xml::normalize_xml(body)?,
    };

    for (index, row) in result.rows.iter_mut().enumerate() {
        if !row.has_value(ROW_NUM_FIELD) {
            row.insert(ROW_NUM_FIELD, index + 1);
        }
    }

    log::debug!(
        "Normalized {} {} rows (totalCnt={})",
        result.rows.len(),
        format,
        result.total_count
    );
    Ok(result)
}

/// Reads the leading decimal digits of `text` (after trimming), 0 if none.
pub(crate) fn parse_count(text: &str) -> usize {
    let trimmed = text.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..digits_end].parse().unwrap_or(0)
}
