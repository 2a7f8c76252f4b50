//! Fetch-window policy and client-side paging.
//!
//! The upstream only serves contiguous, 1-based, inclusive index ranges. With
//! no filter, one page is fetched per request. With a filter, the first
//! `FILTER_FETCH_CEILING` rows (or fewer, when the total is known) are
//! fetched, filtered locally, and sliced into pages.

use std::fmt;

use crate::config::{FILTER_FETCH_CEILING, PAGE_BUTTON_WINDOW, SAMPLE_ROW_LIMIT};
use crate::error_handling::PaginationError;
use crate::models::Row;

/// A 1-based inclusive row range requested from the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    start: usize,
    end: usize,
}

impl PageWindow {
    /// Creates a window, enforcing `1 <= start <= end`.
    pub fn new(start: usize, end: usize) -> Result<Self, PaginationError> {
        if start == 0 || end < start {
            return Err(PaginationError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// First row index (1-based).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last row index (inclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of rows covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Always false; a window covers at least one row.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

fn check_page(page: usize, page_size: usize) -> Result<(), PaginationError> {
    if page == 0 {
        return Err(PaginationError::ZeroPage);
    }
    if page_size == 0 {
        return Err(PaginationError::ZeroPageSize);
    }
    Ok(())
}

/// Computes the window to request from the upstream.
///
/// `known_total` is the total from a prior fetch, 0 when unknown.
///
/// - No filter: `[(page-1)*size + 1, min(page*size, known_total)]`, where an
///   unknown total leaves the end at `page*size`. A page past the known total
///   collapses to `[start, start]`.
/// - Filter active: `[1, min(FILTER_FETCH_CEILING, known_total)]`, or
///   `[1, FILTER_FETCH_CEILING]` when the total is unknown. Rows beyond the
///   ceiling are never seen by the filter.
///
/// # Errors
///
/// `PaginationError::ZeroPage` / `ZeroPageSize` for a zero page or size.
pub fn fetch_window(
    page: usize,
    page_size: usize,
    known_total: usize,
    filter_active: bool,
) -> Result<PageWindow, PaginationError> {
    check_page(page, page_size)?;

    if filter_active {
        let end = if known_total > 0 {
            known_total.min(FILTER_FETCH_CEILING)
        } else {
            FILTER_FETCH_CEILING
        };
        return PageWindow::new(1, end);
    }

    let start = (page - 1).saturating_mul(page_size).saturating_add(1);
    let requested_end = page.saturating_mul(page_size);
    let end = if known_total > 0 {
        requested_end.min(known_total)
    } else {
        requested_end
    };
    PageWindow::new(start, end.max(start))
}

/// The fixed window served by the sample token.
pub fn sample_window() -> PageWindow {
    PageWindow {
        start: 1,
        end: SAMPLE_ROW_LIMIT,
    }
}

/// Slices an already-fetched list to `[(page-1)*size, page*size)`.
///
/// # Errors
///
/// `PaginationError::ZeroPage` / `ZeroPageSize` for a zero page or size.
pub fn page_slice(rows: Vec<Row>, page: usize, page_size: usize) -> Result<Vec<Row>, PaginationError> {
    check_page(page, page_size)?;
    let skip = (page - 1).saturating_mul(page_size);
    Ok(rows.into_iter().skip(skip).take(page_size).collect())
}

/// Number of pages for `total` rows; 1 when there are no rows.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if total == 0 || page_size == 0 {
        1
    } else {
        total.div_ceil(page_size)
    }
}

/// Page numbers to show as buttons: a sliding window of 5.
///
/// All pages when there are at most 5; the first 5 while `current <= 3`;
/// the last 5 once `current >= total - 2`; otherwise centered on `current`.
pub fn page_buttons(current: usize, total: usize) -> Vec<usize> {
    let window = PAGE_BUTTON_WINDOW;
    let first = if total <= window || current <= 3 {
        1
    } else if current >= total - 2 {
        total - (window - 1)
    } else {
        current - 2
    };
    (first..first + window.min(total)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_no_filter() {
        let window = fetch_window(3, 10, 0, false).expect("valid");
        assert_eq!((window.start(), window.end()), (21, 30));
        let window = fetch_window(3, 10, 500, false).expect("valid");
        assert_eq!((window.start(), window.end()), (21, 30));
        let window = fetch_window(1, 10, 0, false).expect("valid");
        assert_eq!(window.to_string(), "[1, 10]");
    }

    #[test]
    fn test_window_clamped_to_known_total() {
        let window = fetch_window(3, 10, 25, false).expect("valid");
        assert_eq!((window.start(), window.end()), (21, 25));
        // Past the end: collapses instead of violating end >= start
        let window = fetch_window(5, 10, 25, false).expect("valid");
        assert_eq!((window.start(), window.end()), (41, 41));
    }

    #[test]
    fn test_window_with_filter() {
        let window = fetch_window(4, 10, 0, true).expect("valid");
        assert_eq!((window.start(), window.end()), (1, 1000));
        let window = fetch_window(1, 10, 321, true).expect("valid");
        assert_eq!((window.start(), window.end()), (1, 321));
        let window = fetch_window(1, 50, 48_000, true).expect("valid");
        assert_eq!((window.start(), window.end()), (1, 1000));
    }

    #[test]
    fn test_window_rejects_zero_inputs() {
        assert_eq!(fetch_window(0, 10, 0, false), Err(PaginationError::ZeroPage));
        assert_eq!(fetch_window(1, 0, 0, true), Err(PaginationError::ZeroPageSize));
        assert!(PageWindow::new(0, 3).is_err());
        assert!(PageWindow::new(4, 3).is_err());
        assert_eq!(PageWindow::new(4, 4).map(|w| w.len()), Ok(1));
    }

    #[test]
    fn test_sample_window() {
        let window = sample_window();
        assert_eq!((window.start(), window.end()), (1, 5));
    }

    #[test]
    fn test_page_slice() {
        let rows: Vec<Row> = (1..=25usize)
            .map(|n| [("ROW_NUM", n)].into_iter().collect())
            .collect();
        let page = page_slice(rows.clone(), 3, 10).expect("valid");
        assert_eq!(page.len(), 5);
        assert_eq!(page[0].text("ROW_NUM").as_deref(), Some("21"));
        assert!(page_slice(rows, 4, 10).expect("valid").is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(321, 20), 17);
    }

    #[test]
    fn test_page_buttons() {
        assert_eq!(page_buttons(1, 3), vec![1, 2, 3]);
        assert_eq!(page_buttons(2, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_buttons(3, 20), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_buttons(10, 20), vec![8, 9, 10, 11, 12]);
        assert_eq!(page_buttons(18, 20), vec![16, 17, 18, 19, 20]);
        assert_eq!(page_buttons(20, 20), vec![16, 17, 18, 19, 20]);
        assert_eq!(page_buttons(4, 6), vec![2, 3, 4, 5, 6]);
    }
}
