//! Configuration types and CLI value enums.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::ValueEnum;
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_API_KEY, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, SAMPLE_TOKEN,
};
use crate::config::headers::{CONTENT_TYPE_JSON, CONTENT_TYPE_XML};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Response format requested from the upstream API.
///
/// The lowercase name is used verbatim as a URL path segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum DataFormat {
    /// JSON body, in either the keyed or the flat envelope
    Json,
    /// XML document with `totalCnt` and `row` elements
    Xml,
}

impl DataFormat {
    /// Content-Type header sent with requests for this format.
    pub fn content_type(self) -> &'static str {
        match self {
            DataFormat::Json => CONTENT_TYPE_JSON,
            DataFormat::Xml => CONTENT_TYPE_XML,
        }
    }
}

/// A configuration field that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is expected
    pub message: String,
}

/// Library configuration (no CLI dependencies).
///
/// Passed explicitly to the fetch orchestrator; nothing in the library reads
/// global configuration.
///
/// # Examples
///
/// ```no_run
/// use agri_open_data::Config;
///
/// let config = Config {
///     use_sample: true,
///     ..Default::default()
/// };
/// assert_eq!(config.api_token(), "sample");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// API access key used as the first path segment
    pub api_key: String,

    /// Base URL of the upstream API (or of a relay in front of it)
    pub base_url: String,

    /// Use the 5-row sample token instead of the API key
    pub use_sample: bool,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            use_sample: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Path token placed before the format segment: the sample token in
    /// sample mode, otherwise the API key.
    pub fn api_token(&self) -> &str {
        if self.use_sample {
            SAMPLE_TOKEN
        } else {
            &self.api_key
        }
    }

    /// Checks field values before any request is made.
    ///
    /// # Errors
    ///
    /// Returns the first field that fails, with a message describing the
    /// expected value.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.use_sample && self.api_key.trim().is_empty() {
            return Err(ConfigValidationError {
                field: "api_key",
                message: "must not be empty (set --api-key or AGRI_API_KEY, or use --sample)"
                    .to_string(),
            });
        }

        match url::Url::parse(&self.base_url) {
            Ok(parsed) if parsed.cannot_be_a_base() => {
                return Err(ConfigValidationError {
                    field: "base_url",
                    message: format!("'{}' cannot be used as a base URL", self.base_url),
                });
            }
            Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => {
                return Err(ConfigValidationError {
                    field: "base_url",
                    message: format!(
                        "scheme must be http or https, got '{}'",
                        parsed.scheme()
                    ),
                });
            }
            Ok(_) => {}
            Err(e) => {
                return Err(ConfigValidationError {
                    field: "base_url",
                    message: format!("'{}' is not a valid URL: {}", self.base_url, e),
                });
            }
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError {
                field: "timeout_seconds",
                message: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}
