//! Client-side substring filter over the display-name field.
//!
//! The upstream cannot search, so filtering happens after a widened fetch
//! (see `paginate::fetch_window`).

use crate::config::DISPLAY_NAME_FIELD;
use crate::models::Row;

/// A non-blank, trimmed search pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pattern: String,
    needle: String,
}

impl SearchFilter {
    /// Returns `None` for an empty or whitespace-only pattern, which means
    /// "no filter".
    pub fn parse(input: &str) -> Option<Self> {
        let pattern = input.trim();
        if pattern.is_empty() {
            return None;
        }
        Some(Self {
            pattern: pattern.to_string(),
            needle: pattern.to_lowercase(),
        })
    }

    /// The trimmed pattern as entered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Case-insensitive containment test against `KOREAN_NM`; a missing field
    /// never matches.
    pub fn matches(&self, row: &Row) -> bool {
        row.text(DISPLAY_NAME_FIELD)
            .is_some_and(|name| name.to_lowercase().contains(&self.needle))
    }
}

/// Keeps the rows whose display name contains the pattern, in order.
pub fn filter_rows(rows: Vec<Row>, filter: &SearchFilter) -> Vec<Row> {
    rows.into_iter().filter(|row| filter.matches(row)).collect()
}
