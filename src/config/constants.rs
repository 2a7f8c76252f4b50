//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including upstream endpoints, dataset identifiers, and paging limits.

// Upstream API
/// Base URL of the upstream open-data API (HTTP only).
pub const DEFAULT_BASE_URL: &str = "http://211.237.50.150:7080/openapi";

/// Development API key used when neither `--api-key` nor `AGRI_API_KEY` is set.
pub const DEFAULT_API_KEY: &str =
    "0db405d287f1020dccb58c108ac0a1adcbd576b6b0fd43d4e23dcc5c44d237a2";

/// Environment variable holding the API key (also read from `.env`).
pub const API_KEY_ENV: &str = "AGRI_API_KEY";

/// Path token that selects the upstream's 5-row sample service instead of a real key.
pub const SAMPLE_TOKEN: &str = "sample";

/// Number of rows the sample token serves.
pub const SAMPLE_ROW_LIMIT: usize = 5;

/// Grid id of the dataset catalog (searchable dataset listing).
pub const CATALOG_GRID_ID: &str = "Grid_20210909000000000613_1";

/// Grid id of the vegetable production statistics dataset.
pub const VEGETABLES_GRID_ID: &str = "Grid_20151029000000000254_1";

/// Result code the upstream puts in `result.code` on success.
pub const API_SUCCESS_CODE: &str = "INFO-000";

// Paging
/// Default number of catalog rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered to the user.
pub const PAGE_SIZE_CHOICES: &[usize] = &[10, 20, 50, 100];

/// Upper bound on the window fetched when a client-side filter is active.
///
/// The upstream cannot search by substring, so filtering scans the first
/// `FILTER_FETCH_CEILING` rows only. Rows past the ceiling are unreachable
/// by the filter.
pub const FILTER_FETCH_CEILING: usize = 1000;

/// Number of page buttons shown at once.
pub const PAGE_BUTTON_WINDOW: usize = 5;

/// Rows fetched for the vegetable production view.
pub const VEGETABLES_FETCH_LIMIT: usize = 1000;

// Row fields
/// Field matched by the client-side filter and used as the display title.
pub const DISPLAY_NAME_FIELD: &str = "KOREAN_NM";
/// Dataset identifier (first part of a row identity).
pub const DATASET_ID_FIELD: &str = "DATASET_ID";
/// Data item identifier (second part of a row identity).
pub const DATA_ID_FIELD: &str = "DATA_ID";
/// Upstream row number; synthesized when missing.
pub const ROW_NUM_FIELD: &str = "ROW_NUM";

/// Separator between the parts of a row identity key.
pub const ROW_KEY_SEPARATOR: &str = "_";

// HTTP client
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent header value.
pub const DEFAULT_USER_AGENT: &str = concat!("agri_open_data/", env!("CARGO_PKG_VERSION"));

// User-visible messages
/// Shown when a fetch fails and neither the payload nor the transport gave a message.
pub const FALLBACK_ERROR_MESSAGE: &str = "API 연결 실패";

/// Used when the payload reports a failure code without a message.
pub const FALLBACK_API_ERROR_MESSAGE: &str = "API 오류가 발생했습니다.";

/// Informational message for an empty, unfiltered result.
pub const NO_DATA_MESSAGE: &str = "조회된 데이터가 없습니다.";

// Relay
/// HTTP origin the relay forwards to.
pub const DEFAULT_RELAY_UPSTREAM: &str = "http://211.237.50.150:7080";

/// Mount prefix stripped from incoming relay paths.
pub const DEFAULT_RELAY_PREFIX: &str = "/.netlify/functions/proxy";

/// Default relay listen port.
pub const DEFAULT_RELAY_PORT: u16 = 8888;
