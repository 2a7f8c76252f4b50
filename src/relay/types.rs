//! Relay server state.

use url::Url;

use crate::error_handling::RelayError;
use crate::initialization::init_relay_client;

/// Shared state for the relay handlers.
///
/// Read-only after construction; cloned into each request.
#[derive(Clone)]
pub struct RelayState {
    pub(crate) client: reqwest::Client,
    upstream: String,
    strip_prefix: String,
}

impl RelayState {
    /// Validates `upstream` and builds the forwarding client.
    ///
    /// # Errors
    ///
    /// `RelayError::InvalidUpstream` for an unparseable origin,
    /// `RelayError::Client` if the client cannot be built.
    pub fn new(upstream: &str, strip_prefix: &str, timeout_seconds: u64) -> Result<Self, RelayError> {
        Url::parse(upstream).map_err(|source| RelayError::InvalidUpstream {
            upstream: upstream.to_string(),
            source,
        })?;
        Ok(Self {
            client: init_relay_client(timeout_seconds)?,
            upstream: upstream.trim_end_matches('/').to_string(),
            strip_prefix: strip_prefix.trim_end_matches('/').to_string(),
        })
    }

    /// Upstream origin, without a trailing slash.
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// Upstream URL for an incoming path and query: the mount prefix is
    /// removed from the path, the query string is kept as is.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        let path = if self.strip_prefix.is_empty() {
            path
        } else {
            path.strip_prefix(self.strip_prefix.as_str()).unwrap_or(path)
        };
        match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.upstream, path, q),
            _ => format!("{}{}", self.upstream, path),
        }
    }
}
