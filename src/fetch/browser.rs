//! Paged, filterable view over one upstream dataset.
//!
//! `DatasetBrowser` owns the view state (page, page size, format, filter,
//! totals) and turns each user action into one fetch. Every fetch gets
//! a ticket; only the completion carrying the latest ticket is applied, so a
//! slow response can never overwrite a newer one.

use log::{debug, info, warn};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};
use url::Url;

use crate::config::{Config, DataFormat, CATALOG_GRID_ID, DEFAULT_PAGE_SIZE, NO_DATA_MESSAGE};
use crate::dedup::dedup;
use crate::error_handling::{FetchError, PaginationError};
use crate::fetch::request::build_request_url;
use crate::fetch::transport::Transport;
use crate::filter::{filter_rows, SearchFilter};
use crate::models::Row;
use crate::normalize::normalize;
use crate::paginate::{fetch_window, page_buttons, page_slice, sample_window, total_pages, PageWindow};

/// Lifecycle of the view.
///
/// `Idle -> Loading -> {Success, Failure}`; the terminal states accept the
/// next action like `Idle` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FetchState {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last applied fetch succeeded (possibly with zero rows)
    Success,
    /// The last applied fetch failed
    Failure,
}

/// What happened to one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Rows were applied to the view.
    Loaded {
        /// Rows on the current page
        rows: usize,
    },
    /// The fetch succeeded with nothing to show.
    Empty {
        /// Informational message ("no data" or "no match for ...")
        message: String,
    },
    /// The fetch failed; the view shows no rows.
    Failed {
        /// User-facing error message
        message: String,
    },
    /// A newer fetch was issued before this one completed; it was discarded.
    Superseded,
}

/// A fetch that has been issued but not yet applied.
///
/// Captures the view parameters at issue time.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    ticket: u64,
    url: Url,
    window: PageWindow,
    format: DataFormat,
    filter: Option<SearchFilter>,
    page: usize,
    page_size: usize,
}

impl PendingFetch {
    /// Request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Window requested from the upstream.
    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Declared response format.
    pub fn format(&self) -> DataFormat {
        self.format
    }
}

/// Owned snapshot of the view, for rendering or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    /// Lifecycle state
    pub state: FetchState,
    /// Rows on the current page
    pub rows: Vec<Row>,
    /// Displayed total (matched count under a filter)
    pub total_count: usize,
    /// Current page (1-based)
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
    /// Number of pages for `total_count`
    pub total_pages: usize,
    /// Page numbers to offer as buttons
    pub page_buttons: Vec<usize>,
    /// Active search pattern
    pub filter: Option<String>,
    /// Error or empty-result message
    pub message: Option<String>,
    /// Whether the sample token was used
    pub sample: bool,
}

/// Fetch orchestrator for one dataset.
pub struct DatasetBrowser<T> {
    config: Config,
    transport: T,
    grid_id: String,
    page: usize,
    page_size: usize,
    format: DataFormat,
    filter: Option<SearchFilter>,
    /// Last positive `totalCnt`; bounds upstream row indices.
    upstream_total: usize,
    /// Displayed total: the matched count under a filter.
    total_count: usize,
    rows: Vec<Row>,
    state: FetchState,
    message: Option<String>,
    latest_ticket: u64,
}

impl<T: Transport> DatasetBrowser<T> {
    /// Creates a browser over `grid_id`, on page 1 with the default page size.
    pub fn new(config: Config, transport: T, grid_id: impl Into<String>) -> Self {
        Self {
            config,
            transport,
            grid_id: grid_id.into(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            format: DataFormat::Json,
            filter: None,
            upstream_total: 0,
            total_count: 0,
            rows: Vec::new(),
            state: FetchState::Idle,
            message: None,
            latest_ticket: 0,
        }
    }

    /// Browser over the dataset catalog.
    pub fn catalog(config: Config, transport: T) -> Self {
        Self::new(config, transport, CATALOG_GRID_ID)
    }

    /// Rows on the current page.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Displayed total: the upstream total, or the matched count under a
    /// filter. 0 until a fetch reports one.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Row total last reported by the upstream; 0 when unknown.
    pub fn upstream_total(&self) -> usize {
        self.upstream_total
    }

    /// Current page (1-based).
    pub fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Requested response format.
    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// Active filter, if any.
    pub fn filter(&self) -> Option<&SearchFilter> {
        self.filter.as_ref()
    }

    /// Lifecycle state.
    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Error message after a failure, or the empty-result message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Owned snapshot of the current view.
    pub fn snapshot(&self) -> PageView {
        let pages = total_pages(self.total_count, self.page_size);
        PageView {
            state: self.state,
            rows: self.rows.clone(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            total_pages: pages,
            page_buttons: page_buttons(self.page, pages),
            filter: self.filter.as_ref().map(|f| f.pattern().to_string()),
            message: self.message.clone(),
            sample: self.config.use_sample,
        }
    }

    /// Sets the response format used by subsequent fetches.
    pub fn set_format(&mut self, format: DataFormat) {
        self.format = format;
    }

    /// Sets the page without fetching.
    ///
    /// # Errors
    ///
    /// `PaginationError::ZeroPage` for page 0.
    pub fn set_page(&mut self, page: usize) -> Result<(), PaginationError> {
        if page == 0 {
            return Err(PaginationError::ZeroPage);
        }
        self.page = page;
        Ok(())
    }

    /// Sets the page size and resets to page 1, without fetching.
    ///
    /// # Errors
    ///
    /// `PaginationError::ZeroPageSize` for size 0.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Sets (or clears, for a blank pattern) the filter and resets to page 1,
    /// without fetching.
    pub fn set_filter(&mut self, pattern: &str) {
        self.filter = SearchFilter::parse(pattern);
        self.page = 1;
    }

    /// Issues a fetch for the current view: assigns a ticket, enters
    /// `Loading`, and returns what to request.
    ///
    /// # Errors
    ///
    /// Fails when the request URL cannot be built; the view is then already
    /// in `Failure`.
    pub fn begin_fetch(&mut self) -> Result<PendingFetch, FetchError> {
        self.latest_ticket += 1;
        self.state = FetchState::Loading;

        let window = if self.config.use_sample {
            Ok(sample_window())
        } else {
            fetch_window(self.page, self.page_size, self.upstream_total, self.filter.is_some())
        };
        let issued = window.map_err(FetchError::from).and_then(|window| {
            build_request_url(
                &self.config.base_url,
                self.config.api_token(),
                self.format,
                &self.grid_id,
                window,
            )
            .map(|url| (url, window))
        });

        match issued {
            Ok((url, window)) => {
                debug!(
                    "Fetch #{} for page {} (size {}): window {}",
                    self.latest_ticket, self.page, self.page_size, window
                );
                Ok(PendingFetch {
                    ticket: self.latest_ticket,
                    url,
                    window,
                    format: self.format,
                    filter: self.filter.clone(),
                    page: self.page,
                    page_size: self.page_size,
                })
            }
            Err(e) => {
                self.apply_failure(&e);
                Err(e)
            }
        }
    }

    /// Applies the result of a pending fetch.
    ///
    /// A completion whose ticket is not the latest is discarded without
    /// touching the view.
    pub fn complete_fetch(
        &mut self,
        pending: PendingFetch,
        body: Result<String, FetchError>,
    ) -> FetchOutcome {
        if pending.ticket != self.latest_ticket {
            debug!(
                "Discarding superseded fetch #{} (latest is #{})",
                pending.ticket, self.latest_ticket
            );
            return FetchOutcome::Superseded;
        }

        match body.and_then(|body| self.process_body(&pending, &body)) {
            Ok(rows) if rows.is_empty() => {
                let message = match &pending.filter {
                    Some(filter) => format!("\"{}\" 검색 결과가 없습니다.", filter.pattern()),
                    None => NO_DATA_MESSAGE.to_string(),
                };
                info!("{message}");
                self.rows.clear();
                self.state = FetchState::Success;
                self.message = Some(message.clone());
                FetchOutcome::Empty { message }
            }
            Ok(rows) => {
                let count = rows.len();
                info!(
                    "Loaded {count} rows (page {} of {}, total {})",
                    pending.page,
                    total_pages(self.total_count, pending.page_size),
                    self.total_count
                );
                self.rows = rows;
                self.state = FetchState::Success;
                self.message = None;
                FetchOutcome::Loaded { rows: count }
            }
            Err(e) => {
                let message = self.apply_failure(&e);
                FetchOutcome::Failed { message }
            }
        }
    }

    /// Normalizes, deduplicates and (under a filter) filters and slices.
    fn process_body(&mut self, pending: &PendingFetch, body: &str) -> Result<Vec<Row>, FetchError> {
        let result = normalize(body, pending.format, &self.grid_id)?;
        if result.total_count > 0 {
            self.upstream_total = result.total_count;
        }
        let rows = dedup(result.rows);

        match &pending.filter {
            Some(filter) => {
                let matched = filter_rows(rows, filter);
                self.total_count = matched.len();
                Ok(page_slice(matched, pending.page, pending.page_size)?)
            }
            None => {
                self.total_count = self.upstream_total;
                Ok(rows)
            }
        }
    }

    fn apply_failure(&mut self, error: &FetchError) -> String {
        let message = error.user_message();
        warn!("Fetch failed ({}): {}", error.error_type(), error);
        self.rows.clear();
        self.state = FetchState::Failure;
        self.message = Some(message.clone());
        message
    }

    /// Issues a fetch for the current view and applies its result.
    pub async fn fetch(&mut self) -> FetchOutcome {
        let pending = match self.begin_fetch() {
            Ok(pending) => pending,
            Err(e) => return FetchOutcome::Failed { message: e.user_message() },
        };
        let body = self.transport.get_text(pending.url(), pending.format()).await;
        self.complete_fetch(pending, body)
    }

    /// Initial load of the current view.
    pub async fn load(&mut self) -> FetchOutcome {
        self.fetch().await
    }

    /// Moves to `page` and fetches it.
    ///
    /// # Errors
    ///
    /// `PaginationError::ZeroPage` for page 0; nothing is fetched.
    pub async fn go_to_page(&mut self, page: usize) -> Result<FetchOutcome, PaginationError> {
        self.set_page(page)?;
        Ok(self.fetch().await)
    }

    /// Changes the page size, returns to page 1 and fetches.
    ///
    /// # Errors
    ///
    /// `PaginationError::ZeroPageSize` for size 0; nothing is fetched.
    pub async fn change_page_size(&mut self, page_size: usize) -> Result<FetchOutcome, PaginationError> {
        self.set_page_size(page_size)?;
        Ok(self.fetch().await)
    }

    /// Applies a search pattern, returns to page 1 and fetches. A blank
    /// pattern clears the filter.
    pub async fn search(&mut self, pattern: &str) -> FetchOutcome {
        self.set_filter(pattern);
        self.fetch().await
    }

    /// Clears the filter, returns to page 1 and fetches.
    pub async fn clear_filter(&mut self) -> FetchOutcome {
        self.set_filter("");
        self.fetch().await
    }
}
