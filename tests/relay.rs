//! Integration tests for the HTTP relay
//!
//! A wiremock server plays the upstream origin; requests go through a relay
//! bound to an ephemeral port.

use agri_open_data::relay::{serve_relay, RelayState};
use serde_json::Value;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PREFIX: &str = "/.netlify/functions/proxy";

/// Starts a relay in front of `upstream` and returns its base URL.
async fn start_relay(upstream: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind relay listener");
    let addr = listener.local_addr().expect("Failed to read relay address");
    let state = RelayState::new(upstream, PREFIX, 5).expect("Failed to build relay state");
    tokio::spawn(async move {
        let _ = serve_relay(listener, state).await;
    });
    format!("http://{}", addr)
}

fn assert_cors(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
}

#[tokio::test]
async fn test_get_is_passed_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openapi/sample/xml/Grid_20210909000000000613_1/1/5"))
        .and(query_param("q", "가공"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<r><totalCnt>0</totalCnt></r>", "application/xml;charset=UTF-8"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let relay = start_relay(&upstream.uri()).await;
    let response = reqwest::Client::new()
        .get(format!(
            "{}{}/openapi/sample/xml/Grid_20210909000000000613_1/1/5?q=%EA%B0%80%EA%B3%B5",
            relay, PREFIX
        ))
        .send()
        .await
        .expect("relay request should succeed");

    assert_eq!(response.status(), 200);
    assert_cors(&response);
    assert_eq!(
        response.headers()["content-type"],
        "application/xml;charset=UTF-8"
    );
    assert_eq!(
        response.text().await.expect("body"),
        "<r><totalCnt>0</totalCnt></r>"
    );
}

#[tokio::test]
async fn test_upstream_status_is_kept() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&upstream)
        .await;

    let relay = start_relay(&upstream.uri()).await;
    let response = reqwest::get(format!("{}{}/openapi/nothing", relay, PREFIX))
        .await
        .expect("relay request should succeed");

    assert_eq!(response.status(), 404);
    assert_cors(&response);
    assert_eq!(response.text().await.expect("body"), "missing");
}

#[tokio::test]
async fn test_missing_content_type_defaults_to_json() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"{}".to_vec()))
        .mount(&upstream)
        .await;

    let relay = start_relay(&upstream.uri()).await;
    let response = reqwest::get(format!("{}{}/x", relay, PREFIX))
        .await
        .expect("relay request should succeed");
    assert_eq!(response.headers()["content-type"], "application/json");
}

#[tokio::test]
async fn test_options_preflight() {
    let upstream = MockServer::start().await;
    let relay = start_relay(&upstream.uri()).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, format!("{}{}/openapi", relay, PREFIX))
        .send()
        .await
        .expect("relay request should succeed");

    assert_eq!(response.status(), 200);
    assert_cors(&response);
    assert!(response.text().await.expect("body").is_empty());
    // Answered locally
    assert!(upstream
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
}

#[tokio::test]
async fn test_post_is_rejected() {
    let upstream = MockServer::start().await;
    let relay = start_relay(&upstream.uri()).await;

    let response = reqwest::Client::new()
        .post(format!("{}{}/openapi", relay, PREFIX))
        .body("{}")
        .send()
        .await
        .expect("relay request should succeed");

    assert_eq!(response.status(), 405);
    assert_cors(&response);
    let body: Value =
        serde_json::from_str(&response.text().await.expect("body")).expect("JSON body");
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    // Port 9 (discard) is closed on test machines
    let relay = start_relay("http://127.0.0.1:9").await;

    let response = reqwest::get(format!("{}{}/openapi", relay, PREFIX))
        .await
        .expect("relay request should succeed");

    assert_eq!(response.status(), 500);
    assert_cors(&response);
    let body: Value =
        serde_json::from_str(&response.text().await.expect("body")).expect("JSON body");
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}
