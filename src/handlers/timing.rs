//! Delayed responses.

use std::time::Duration;

use axum::http::Method;
use futures_util::future::BoxFuture;

use crate::handlers::error::allow;
use crate::handlers::params::{clamped, segment};
use crate::handlers::HandlerResult;
use crate::http::request::RequestView;
use crate::http::response;
use crate::http::server::AppState;
use crate::introspect::Facet;

/// Longest delay `/delay/{n}` will honor, in seconds.
pub const MAX_DELAY_SECS: u64 = 10;

const DEFAULT_DELAY_SECS: u64 = 3;

const DELAY_FACETS: [Facet; 7] = [
    Facet::Args,
    Facet::Data,
    Facet::Files,
    Facet::Form,
    Facet::Headers,
    Facet::Origin,
    Facet::Url,
];

/// `/delay/{n}`: sleep `n` seconds (at most 10), then echo the request.
///
/// Only this request's task is suspended.
pub fn delay(view: RequestView, state: AppState) -> BoxFuture<'static, HandlerResult> {
    Box::pin(async move {
        allow(&view, &[Method::GET])?;

        let secs = clamped(segment(view.path(), 2), DEFAULT_DELAY_SECS, MAX_DELAY_SECS);
        tracing::debug!(secs, "Delaying response");
        tokio::time::sleep(Duration::from_secs(secs)).await;

        let doc = state.aggregator.aggregate(&view, &DELAY_FACETS);
        Ok(response::json(&doc)?)
    })
}
