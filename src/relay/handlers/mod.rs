//! Relay request handlers.

mod proxy;

pub use proxy::proxy_handler;
