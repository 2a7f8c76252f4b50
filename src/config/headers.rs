//! HTTP header constants.
//!
//! This module defines the header values sent to the upstream API and the
//! CORS headers the relay attaches to every response.

// CORS headers set by the relay on every response
/// Access-Control-Allow-Origin value
pub const CORS_ALLOW_ORIGIN: &str = "*";
/// Access-Control-Allow-Headers value
pub const CORS_ALLOW_HEADERS: &str = "Content-Type";
/// Access-Control-Allow-Methods value
pub const CORS_ALLOW_METHODS: &str = "GET, OPTIONS";

/// CORS header pairs, in the order they are written.
pub const CORS_HEADERS: &[(&str, &str)] = &[
    ("access-control-allow-origin", CORS_ALLOW_ORIGIN),
    ("access-control-allow-headers", CORS_ALLOW_HEADERS),
    ("access-control-allow-methods", CORS_ALLOW_METHODS),
];

// Content types
/// Content-Type for JSON requests, and the relay's default when upstream sends none
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Content-Type for XML requests
pub const CONTENT_TYPE_XML: &str = "application/xml";
