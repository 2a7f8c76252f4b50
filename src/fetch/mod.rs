//! Fetch orchestration.
//!
//! This module turns view actions (load, change page, change page size,
//! search) into upstream requests and applies the normalized, deduplicated,
//! filtered result to the view:
//! - `request`: request URL construction
//! - `transport`: the HTTP seam (`Transport`, `HttpTransport`)
//! - `browser`: the per-dataset state machine (`DatasetBrowser`)

mod browser;
mod request;
mod transport;

pub use browser::{DatasetBrowser, FetchOutcome, FetchState, PageView, PendingFetch};
pub use request::build_request_url;
pub use transport::{HttpTransport, Transport};
