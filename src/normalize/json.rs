//! JSON payload normalization.
//!
//! The upstream wraps rows in one of two envelopes, and occasionally returns a
//! bare array. Detection order is fixed:
//!
//! 1. `Keyed`: `{ "<datasetKey>": { "totalCnt": .., "row": .. } }`
//! 2. `Flat`: `{ "totalCnt": .., "row": .. }`
//! 3. `BareList`: `[ {..}, {..} ]`
//! 4. `Unrecognized`: anything else (zero rows)
//!
//! A keyed envelope wins even when the root also carries `totalCnt` or `row`.

use log::{debug, warn};
use serde_json::{Map, Value};

use super::parse_count;
use crate::config::{DataFormat, API_SUCCESS_CODE, FALLBACK_API_ERROR_MESSAGE};
use crate::error_handling::FetchError;
use crate::models::{ResultSet, Row};

/// Envelope shapes recognized in a JSON payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum PayloadShape<'a> {
    Keyed(&'a Map<String, Value>),
    Flat(&'a Map<String, Value>),
    BareList(&'a [Value]),
    Unrecognized,
}

pub(crate) fn detect_shape<'a>(root: &'a Value, dataset_key: &str) -> PayloadShape<'a> {
    match root {
        Value::Object(map) => {
            if let Some(Value::Object(envelope)) = map.get(dataset_key) {
                PayloadShape::Keyed(envelope)
            } else if map.contains_key("totalCnt") || map.contains_key("row") {
                PayloadShape::Flat(map)
            } else {
                PayloadShape::Unrecognized
            }
        }
        Value::Array(items) => PayloadShape::BareList(items),
        _ => PayloadShape::Unrecognized,
    }
}

/// Fails when `result.code` is present and differs from the success code.
fn check_result_code(result: Option<&Value>) -> Result<(), FetchError> {
    let Some(Value::Object(result)) = result else {
        return Ok(());
    };
    let code = match result.get("code") {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if code == API_SUCCESS_CODE {
        return Ok(());
    }

    let message = result
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(FALLBACK_API_ERROR_MESSAGE)
        .to_string();
    Err(FetchError::Api { code, message })
}

fn total_from(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0),
        Some(Value::String(s)) => parse_count(s),
        _ => 0,
    }
}

/// `row` may be a single object (exactly one match) or an array of objects.
fn rows_from(value: Option<&Value>) -> Vec<Row> {
    match value {
        Some(Value::Object(object)) => vec![Row::from_json_object(object)],
        Some(Value::Array(items)) => rows_from_items(items),
        _ => Vec::new(),
    }
}

fn rows_from_items(items: &[Value]) -> Vec<Row> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(object) => Some(Row::from_json_object(object)),
            other => {
                debug!("Skipping non-object row entry: {}", other);
                None
            }
        })
        .collect()
}

/// Parses a JSON body into rows and the upstream total.
///
/// # Errors
///
/// `FetchError::Decode` for malformed JSON, `FetchError::Api` when a
/// `result.code` other than `INFO-000` is present at the root or inside the
/// keyed envelope (root takes precedence).
pub(crate) fn normalize_json(body: &str, dataset_key: &str) -> Result<ResultSet, FetchError> {
    let root: Value = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        format: DataFormat::Json,
        message: e.to_string(),
    })?;

    check_result_code(root.get("result"))?;

    let shape = detect_shape(&root, dataset_key);
    let result_set = match shape {
        PayloadShape::Keyed(envelope) => {
            check_result_code(envelope.get("result"))?;
            ResultSet {
                rows: rows_from(envelope.get("row")),
                total_count: total_from(envelope.get("totalCnt")),
            }
        }
        PayloadShape::Flat(envelope) => ResultSet {
            rows: rows_from(envelope.get("row")),
            total_count: total_from(envelope.get("totalCnt")),
        },
        PayloadShape::BareList(items) => ResultSet {
            rows: rows_from_items(items),
            total_count: 0,
        },
        PayloadShape::Unrecognized => {
            warn!(
                "Response matches no known shape for '{}'; treating it as zero rows",
                dataset_key
            );
            ResultSet::default()
        }
    };

    Ok(result_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &str = "Grid_20210909000000000613_1";

    #[test]
    fn test_detect_shape_precedence() {
        let keyed = json!({ KEY: {"totalCnt": 1}, "totalCnt": 9, "row": [] });
        assert!(matches!(detect_shape(&keyed, KEY), PayloadShape::Keyed(_)));

        let flat = json!({"row": null});
        assert!(matches!(detect_shape(&flat, KEY), PayloadShape::Flat(_)));

        let list = json!([{"A": 1}]);
        assert!(matches!(detect_shape(&list, KEY), PayloadShape::BareList(_)));

        let other = json!({"something": "else"});
        assert_eq!(detect_shape(&other, KEY), PayloadShape::Unrecognized);
        assert_eq!(detect_shape(&json!("text"), KEY), PayloadShape::Unrecognized);
    }

    #[test]
    fn test_keyed_key_that_is_not_an_object_falls_through() {
        let payload = json!({ KEY: "oops", "totalCnt": 4, "row": {"A": "x"} });
        assert!(matches!(detect_shape(&payload, KEY), PayloadShape::Flat(_)));
    }

    #[test]
    fn test_total_from_number_and_string() {
        assert_eq!(total_from(Some(&json!(42))), 42);
        assert_eq!(total_from(Some(&json!("1234"))), 1234);
        assert_eq!(total_from(Some(&json!("12abc"))), 12);
        assert_eq!(total_from(Some(&json!("abc"))), 0);
        assert_eq!(total_from(Some(&json!(-3))), 0);
        assert_eq!(total_from(None), 0);
    }

    #[test]
    fn test_check_result_code() {
        assert!(check_result_code(None).is_ok());
        assert!(check_result_code(Some(&json!({"code": "INFO-000"}))).is_ok());
        assert!(check_result_code(Some(&json!({"message": "no code"}))).is_ok());

        match check_result_code(Some(&json!({"code": "ERROR-300"}))) {
            Err(FetchError::Api { code, message }) => {
                assert_eq!(code, "ERROR-300");
                assert_eq!(message, FALLBACK_API_ERROR_MESSAGE);
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_row_entries_are_skipped() {
        let body = json!({"totalCnt": 3, "row": [{"A": "1"}, 7, null, {"A": "2"}]}).to_string();
        let result = normalize_json(&body, KEY).expect("should normalize");
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.total_count, 3);
    }
}
