//! Error type definitions.
//!
//! This module defines the error enums used throughout the application and
//! the `ErrorType` categories used when logging fetch failures.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::{DataFormat, FALLBACK_ERROR_MESSAGE};

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors produced while fetching and normalizing one page of data.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network, DNS or timeout failure reported by the HTTP client.
    #[error("{0}")]
    Transport(#[from] ReqwestError),

    /// The upstream answered with a non-success status and no API message.
    #[error("Request failed with status code {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    /// The payload reported a failure through `result.code`.
    #[error("{message}")]
    Api {
        /// Result code from the payload (e.g. `ERROR-300`)
        code: String,
        /// Result message from the payload, or a fallback
        message: String,
    },

    /// The body was not well-formed JSON or XML.
    #[error("Failed to parse {format} response: {message}")]
    Decode {
        /// Declared format of the body
        format: DataFormat,
        /// Parser error description
        message: String,
    },

    /// The request URL could not be built from the configured base URL.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Page number or page size out of range.
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl FetchError {
    /// Message shown to the user for this failure.
    ///
    /// Priority: the API payload's message, then the transport error text,
    /// then a fixed fallback.
    pub fn user_message(&self) -> String {
        let message = match self {
            FetchError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }

    /// Category used for logging.
    pub fn error_type(&self) -> ErrorType {
        match self {
            FetchError::Transport(e) => super::categorize_reqwest_error(e),
            FetchError::HttpStatus { status } => super::categorize_status(*status),
            FetchError::Api { .. } => ErrorType::ApiResultError,
            FetchError::Decode { .. } => ErrorType::ResponseDecodeError,
            FetchError::InvalidUrl(_) | FetchError::Pagination(_) => {
                ErrorType::HttpRequestBuilderError
            }
        }
    }
}

/// Errors starting or running the relay server.
#[derive(Error, Debug)]
pub enum RelayError {
    /// The upstream origin is not a valid absolute URL.
    #[error("Invalid relay upstream '{upstream}': {source}")]
    InvalidUpstream {
        /// Upstream as given
        upstream: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// The forwarding client could not be built.
    #[error("Relay client initialization error: {0}")]
    Client(#[from] ReqwestError),

    /// The listening socket could not be bound.
    #[error("Failed to bind relay to port {port}: {source}")]
    Bind {
        /// Requested port
        port: u16,
        /// Bind failure
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("Relay server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Errors for invalid paging input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Pages are numbered from 1.
    #[error("Page number must be at least 1")]
    ZeroPage,

    /// A page must hold at least one row.
    #[error("Page size must be at least 1")]
    ZeroPageSize,

    /// A window must satisfy `1 <= start <= end`.
    #[error("Invalid fetch window [{start}, {end}]")]
    InvalidWindow {
        /// First row index (1-based)
        start: usize,
        /// Last row index (inclusive)
        end: usize,
    },
}

/// Categories of fetch failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // HTTP/Network errors
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    HttpRequestTooManyRequests,
    HttpRequestBadRequest,          // 400 Bad Request
    HttpRequestUnauthorized,        // 401 Unauthorized
    HttpRequestForbidden,           // 403 Forbidden
    HttpRequestNotFound,            // 404 Not Found
    HttpRequestInternalServerError, // 500 Internal Server Error
    HttpRequestBadGateway,          // 502 Bad Gateway
    HttpRequestServiceUnavailable,  // 503 Service Unavailable
    HttpRequestGatewayTimeout,      // 504 Gateway Timeout
    // Payload errors
    ApiResultError,
    ResponseDecodeError,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "HTTP request builder error",
            ErrorType::HttpRequestRedirectError => "HTTP request redirect error",
            ErrorType::HttpRequestTimeoutError => "HTTP request timeout error",
            ErrorType::HttpRequestConnectError => "HTTP request connect error",
            ErrorType::HttpRequestBodyError => "HTTP request body error",
            ErrorType::HttpRequestDecodeError => "HTTP request decode error",
            ErrorType::HttpRequestOtherError => "HTTP request other error",
            ErrorType::HttpRequestTooManyRequests => "Too many requests",
            ErrorType::HttpRequestBadRequest => "Bad Request (400)",
            ErrorType::HttpRequestUnauthorized => "Unauthorized (401)",
            ErrorType::HttpRequestForbidden => "Forbidden (403)",
            ErrorType::HttpRequestNotFound => "Not Found (404)",
            ErrorType::HttpRequestInternalServerError => "Internal Server Error (500)",
            ErrorType::HttpRequestBadGateway => "Bad Gateway (502)",
            ErrorType::HttpRequestServiceUnavailable => "Service Unavailable (503)",
            ErrorType::HttpRequestGatewayTimeout => "Gateway Timeout (504)",
            ErrorType::ApiResultError => "API result code error",
            ErrorType::ResponseDecodeError => "Response decode error",
        }
    }
}
