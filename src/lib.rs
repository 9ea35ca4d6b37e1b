//! HTTP request-introspection test server.
//!
//! Every endpoint either mirrors facets of the inbound request back as an
//! ordered JSON document or exhibits one controlled behavior (status codes,
//! redirects, delays, cookies, basic auth, caching headers, generated bytes).

pub mod config;
pub mod entropy;
pub mod handlers;
pub mod http;
pub mod introspect;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::schema::ServerConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
