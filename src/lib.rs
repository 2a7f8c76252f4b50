//! agri_open_data library: agricultural open-data browsing
//!
//! This library fetches pages of the upstream dataset catalog and the
//! vegetable production statistics, normalizes the upstream's inconsistent
//! JSON and XML envelopes into rows, deduplicates them, filters them by name
//! on the client side, and pages the result.
//!
//! # Example
//!
//! ```no_run
//! use agri_open_data::{run_search, CatalogQuery, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     use_sample: true,
//!     ..Default::default()
//! };
//! let query = CatalogQuery {
//!     query: Some("가공".to_string()),
//!     ..Default::default()
//! };
//!
//! let view = run_search(&config, &query).await?;
//! println!("{} of {} rows", view.rows.len(), view.total_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
pub mod dedup;
pub mod display;
mod error_handling;
pub mod fetch;
pub mod filter;
pub mod initialization;
pub mod models;
mod normalize;
pub mod paginate;
pub mod relay;
pub mod vegetables;

// Re-export public API
pub use config::{Config, DataFormat, LogFormat, LogLevel};
pub use error_handling::{
    ErrorType, FetchError, InitializationError, PaginationError, RelayError,
};
pub use fetch::{DatasetBrowser, FetchOutcome, FetchState, HttpTransport, PageView, Transport};
pub use models::{FieldValue, ResultSet, Row};
pub use normalize::normalize;
pub use run::{run_search, run_vegetables, CatalogQuery, VegetablesReport};

// Internal run module (one-shot flows behind the CLI subcommands)
mod run {
    use anyhow::{Context, Result};
    use log::{debug, info};
    use serde::Serialize;

    use crate::config::{Config, DataFormat, DEFAULT_PAGE_SIZE};
    use crate::fetch::{DatasetBrowser, HttpTransport, PageView};
    use crate::initialization::init_client;
    use crate::vegetables::{available_years, fetch_vegetables, rank_by_year, RankedVegetable};

    /// One catalog page request.
    #[derive(Debug, Clone)]
    pub struct CatalogQuery {
        /// Page number (1-based)
        pub page: usize,
        /// Rows per page
        pub page_size: usize,
        /// Response format requested from the API
        pub format: DataFormat,
        /// Name filter; blank means none
        pub query: Option<String>,
    }

    impl Default for CatalogQuery {
        fn default() -> Self {
            Self {
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
                format: DataFormat::Json,
                query: None,
            }
        }
    }

    /// Vegetable ranking for one year (or all years).
    #[derive(Debug, Clone, Serialize)]
    pub struct VegetablesReport {
        /// Ranked year; `None` ranks all years together
        pub year: Option<i32>,
        /// Years present in the data, newest first
        pub years: Vec<i32>,
        /// Crops by descending production
        pub ranked: Vec<RankedVegetable>,
    }

    /// Fetches one catalog page.
    ///
    /// Fetch failures are not errors here: they come back as a view in
    /// `FetchState::Failure` carrying the user-facing message.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, the page or page size is 0, or
    /// the HTTP client cannot be built.
    pub async fn run_search(config: &Config, query: &CatalogQuery) -> Result<PageView> {
        config.validate().context("Invalid configuration")?;

        let client = init_client(config).context("Failed to initialize HTTP client")?;
        let mut browser = DatasetBrowser::catalog(config.clone(), HttpTransport::new(client));
        browser.set_format(query.format);
        browser
            .set_page_size(query.page_size)
            .context("Invalid page size")?;
        browser.set_filter(query.query.as_deref().unwrap_or_default());
        browser.set_page(query.page).context("Invalid page")?;

        let outcome = browser.load().await;
        debug!("Catalog fetch outcome: {:?}", outcome);
        Ok(browser.snapshot())
    }

    /// Fetches the vegetable dataset and ranks one year.
    ///
    /// Without `year`, the newest year in the data is ranked.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, the HTTP client cannot be
    /// built, or the fetch fails.
    pub async fn run_vegetables(config: &Config, year: Option<i32>) -> Result<VegetablesReport> {
        config.validate().context("Invalid configuration")?;

        let client = init_client(config).context("Failed to initialize HTTP client")?;
        let transport = HttpTransport::new(client);
        let records = fetch_vegetables(config, &transport)
            .await
            .context("Failed to fetch vegetable production data")?;

        let years = available_years(&records);
        let year = year.or_else(|| years.first().copied());
        let ranked = rank_by_year(&records, year);
        info!(
            "Ranked {} crops for {}",
            ranked.len(),
            year.map_or_else(|| "all years".to_string(), |y| y.to_string())
        );

        Ok(VegetablesReport {
            year,
            years,
            ranked,
        })
    }
}
