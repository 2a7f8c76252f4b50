//! Row deduplication by composite identity.

use std::collections::HashSet;

use crate::config::{DATASET_ID_FIELD, DATA_ID_FIELD, ROW_KEY_SEPARATOR, ROW_NUM_FIELD};
use crate::models::Row;

/// Identity key of a row: `DATASET_ID _ DATA_ID _ ROW_NUM`.
///
/// Missing ids contribute an empty string; a missing `ROW_NUM` is replaced by
/// the row's 0-based position in its batch.
pub fn row_identity(row: &Row, index: usize) -> String {
    let dataset_id = row.non_blank_text(DATASET_ID_FIELD).unwrap_or_default();
    let data_id = row.non_blank_text(DATA_ID_FIELD).unwrap_or_default();
    let row_num = row
        .non_blank_text(ROW_NUM_FIELD)
        .map(|s| s.into_owned())
        .unwrap_or_else(|| index.to_string());
    [&*dataset_id, &*data_id, row_num.as_str()].join(ROW_KEY_SEPARATOR)
}

/// Removes rows whose identity was already seen. First occurrence wins and
/// the relative order of survivors is unchanged.
pub fn dedup(rows: Vec<Row>) -> Vec<Row> {
    let before = rows.len();
    let mut seen = HashSet::with_capacity(before);
    let unique: Vec<Row> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| seen.insert(row_identity(&row, index)).then_some(row))
        .collect();

    if unique.len() < before {
        log::debug!("Dropped {} duplicate rows", before - unique.len());
    }
    unique
}
