//! HTTP relay in front of the upstream data API.
//!
//! Browsers served over HTTPS cannot call the plain-HTTP upstream directly.
//! The relay accepts GET under a mount prefix, forwards path and query to
//! the upstream origin, and passes status, content type and body back with
//! CORS headers attached.

mod handlers;
mod types;

use axum::Router;
use tokio::net::TcpListener;

use crate::error_handling::RelayError;
use handlers::proxy_handler;
pub use types::RelayState;

/// Builds the relay router. Every path and method reaches the proxy handler.
pub fn relay_router(state: RelayState) -> Router {
    Router::new().fallback(proxy_handler).with_state(state)
}

/// Serves the relay on an already-bound listener until the server stops.
///
/// # Errors
///
/// `RelayError::Serve` if the server fails.
pub async fn serve_relay(listener: TcpListener, state: RelayState) -> Result<(), RelayError> {
    axum::serve(listener, relay_router(state))
        .await
        .map_err(RelayError::Serve)
}

/// Binds `127.0.0.1:port` and serves the relay.
///
/// # Errors
///
/// `RelayError::Bind` if the port is unavailable, `RelayError::Serve` if the
/// server fails afterwards.
pub async fn start_relay_server(port: u16, state: RelayState) -> Result<(), RelayError> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|source| RelayError::Bind { port, source })?;

    log::info!("Relay listening on http://127.0.0.1:{}/", port);
    log::info!("  - Upstream: {}", state.upstream());

    serve_relay(listener, state).await
}
