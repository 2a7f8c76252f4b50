//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoints, dataset ids, paging limits)
//! - HTTP header constants
//! - Configuration types and validation
//! - The command-line interface

mod cli;
mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use cli::{Cli, Command, GlobalArgs, RelayArgs, SearchArgs, VegetablesArgs};
pub use headers::*;
pub use types::{Config, ConfigValidationError, DataFormat, LogFormat, LogLevel};
