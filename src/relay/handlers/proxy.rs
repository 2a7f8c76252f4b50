//! Pass-through handler.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use log::{debug, warn};
use serde_json::json;

use super::super::types::RelayState;
use crate::config::{CONTENT_TYPE_JSON, CORS_HEADERS};

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for &(name, value) in CORS_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response {
    let mut headers = cors_headers();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
    (status, headers, body.to_string()).into_response()
}

/// Forwards GET requests to the upstream origin.
///
/// OPTIONS is answered locally; any other method gets 405. Every response
/// carries the CORS headers.
pub async fn proxy_handler(State(state): State<RelayState>, method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, cors_headers(), Body::empty()).into_response();
    }
    if method != Method::GET {
        debug!("Rejecting {method} {uri}");
        return json_response(
            StatusCode::METHOD_NOT_ALLOWED,
            json!({"error": "Method not allowed"}),
        );
    }

    let target = state.target_url(uri.path(), uri.query());
    debug!("Relaying {} -> {}", uri, target);

    let result = async {
        let response = state
            .client
            .get(&target)
            .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .send()
            .await?;
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;
        Ok::<_, reqwest::Error>((status, content_type, body))
    }
    .await;

    match result {
        Ok((status, content_type, body)) => {
            let mut headers = cors_headers();
            headers.insert(
                header::CONTENT_TYPE,
                content_type.unwrap_or(HeaderValue::from_static(CONTENT_TYPE_JSON)),
            );
            (status, headers, body).into_response()
        }
        Err(e) => {
            warn!("Relay request to {} failed: {}", target, e);
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Internal server error", "message": e.to_string()}),
            )
        }
    }
}
