//! Error handling.
//!
//! This module provides:
//! - Error type definitions for initialization, fetching, paging and the relay
//! - Categorization of transport failures for logging
//!
//! Fetch failures fall into:
//! - **Transport**: network, DNS, timeout or non-success HTTP status
//! - **API**: a successful response whose payload carries a failure code
//! - **Decode**: a body that is not well-formed JSON or XML
//!
//! Unrecognized payload shapes and empty results are not errors.

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, categorize_status};
pub use types::{ErrorType, FetchError, InitializationError, PaginationError, RelayError};
