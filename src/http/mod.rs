//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all dispatch)
//!     → request.rs (buffer body, parse query/forms/cookies into a RequestView)
//!     → handlers (looked up in the RouteTable)
//!     → response.rs (JSON, HTML, text, redirects, plain-text errors)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestError, RequestView, UploadedFile};
pub use server::{AppState, HttpServer};
