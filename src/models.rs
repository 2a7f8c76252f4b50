//! Row records and result sets shared by the normalizer, filter and orchestrator.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number, Value};

/// A single field value. Absent values are represented by a missing key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value (XML text content, JSON strings, or other JSON scalars as text)
    Text(String),
    /// Numeric JSON value, kept with its original representation
    Number(Number),
}

impl FieldValue {
    /// True for an empty text or a numeric zero.
    ///
    /// Such values count as missing wherever a field is tested for presence
    /// (e.g. `ROW_NUM`).
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.as_f64() == Some(0.0),
        }
    }

    /// Borrowed text for strings, formatted text for numbers.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Numeric interpretation: numbers as-is, text by its leading decimal literal.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => parse_leading_f64(s),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<usize> for FieldValue {
    fn from(n: usize) -> Self {
        FieldValue::Number(Number::from(n))
    }
}

/// Parses the longest leading decimal literal of `s` (after leading whitespace),
/// the way upstream numeric text such as `"1234.5 톤"` is read.
fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

/// One record from an upstream grid. Fields are sparse and schema-less.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, FieldValue>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a row from a JSON object.
    ///
    /// `null` fields are dropped; booleans, arrays and objects are stored as
    /// their JSON text.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        object
            .iter()
            .filter_map(|(key, value)| {
                let field = match value {
                    Value::Null => return None,
                    Value::String(s) => FieldValue::Text(s.clone()),
                    Value::Number(n) => FieldValue::Number(n.clone()),
                    other => FieldValue::Text(other.to_string()),
                };
                Some((key.clone(), field))
            })
            .collect()
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the field value, if present.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Returns the field as text, if present.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.fields.get(key).map(FieldValue::as_text)
    }

    /// Returns the field as text when present and not blank.
    pub fn non_blank_text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.fields
            .get(key)
            .filter(|v| !v.is_blank())
            .map(FieldValue::as_text)
    }

    /// True when the field is present and not blank.
    pub fn has_value(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(|v| !v.is_blank())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered rows plus the total count that page math is based on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    /// Rows in upstream order
    pub rows: Vec<Row>,
    /// Upstream total (no filter) or filtered length (filter active)
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object_drops_null_and_keeps_numbers() {
        let value = json!({"KOREAN_NM": "가공업체", "ROW_NUM": 3, "RM": null, "FLAG": true});
        let row = Row::from_json_object(value.as_object().expect("object"));
        assert_eq!(row.len(), 3);
        assert_eq!(row.text("KOREAN_NM").as_deref(), Some("가공업체"));
        assert_eq!(row.get("ROW_NUM"), Some(&FieldValue::from(3usize)));
        assert_eq!(row.text("FLAG").as_deref(), Some("true"));
        assert!(row.get("RM").is_none());
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::from("").is_blank());
        assert!(FieldValue::from(0usize).is_blank());
        assert!(!FieldValue::from(" ").is_blank());
        assert!(!FieldValue::from(7usize).is_blank());
    }

    #[test]
    fn test_has_value_and_non_blank_text() {
        let row: Row = [("A", "x"), ("B", "")].into_iter().collect();
        assert!(row.has_value("A"));
        assert!(!row.has_value("B"));
        assert!(!row.has_value("C"));
        assert_eq!(row.non_blank_text("A").as_deref(), Some("x"));
        assert_eq!(row.non_blank_text("B"), None);
    }

    #[test]
    fn test_as_f64_reads_leading_number() {
        assert_eq!(FieldValue::from("1234.5").as_f64(), Some(1234.5));
        assert_eq!(FieldValue::from(" 42톤").as_f64(), Some(42.0));
        assert_eq!(FieldValue::from("-3.25e").as_f64(), Some(-3.25));
        assert_eq!(FieldValue::from("톤").as_f64(), None);
        assert_eq!(FieldValue::from("").as_f64(), None);
        assert_eq!(FieldValue::from(12usize).as_f64(), Some(12.0));
    }

    #[test]
    fn test_row_serializes_as_flat_object() {
        let mut row = Row::new();
        row.insert("DATA_ID", "D1");
        row.insert("ROW_NUM", 2usize);
        let value = serde_json::to_value(&row).expect("serialize");
        assert_eq!(value, json!({"DATA_ID": "D1", "ROW_NUM": 2}));
    }
}
