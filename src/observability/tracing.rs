//! Per-request spans.
//!
//! A client-supplied `X-Request-Id` is reused; otherwise a fresh v4 UUID is
//! minted. The id lives on the span only and is never written back into the
//! request, so echoed headers stay exactly what the client sent.

use axum::{body::Body, http::Request};
use tracing::Span;
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// `MakeSpan` for `TraceLayer`.
pub fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}
