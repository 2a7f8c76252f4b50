//! The HTTP seam between the orchestrator and the network.

use std::future::Future;
use std::sync::Arc;

use log::debug;
use serde_json::Value;
use url::Url;

use crate::config::DataFormat;
use crate::error_handling::FetchError;

/// Something that can GET a URL and hand back the body as text.
///
/// The orchestrator is generic over this so tests and embedders can swap the
/// network layer.
pub trait Transport {
    /// Fetches `url`, declaring `format` as the expected content type.
    ///
    /// Non-2xx responses must be reported as errors, never as a body.
    fn get_text(
        &self,
        url: &Url,
        format: DataFormat,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<reqwest::Client>,
}

impl HttpTransport {
    /// Wraps a client built by `initialization::init_client`.
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get_text(&self, url: &Url, format: DataFormat) -> Result<String, FetchError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::CONTENT_TYPE, format.content_type())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }

        debug!("Upstream answered {status} for {url}");
        Err(api_error_from_body(&body).unwrap_or(FetchError::HttpStatus {
            status: status.as_u16(),
        }))
    }
}

/// Extracts `result.message` from an error response body, if it is JSON and
/// carries one.
pub(crate) fn api_error_from_body(body: &str) -> Option<FetchError> {
    let root: Value = serde_json::from_str(body).ok()?;
    let result = root.get("result")?;
    let message = result.get("message")?.as_str()?.trim();
    if message.is_empty() {
        return None;
    }
    let code = result
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(FetchError::Api {
        code,
        message: message.to_string(),
    })
}
