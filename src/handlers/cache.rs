//! Caching endpoints.

use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;

use crate::handlers::error::allow;
use crate::handlers::params::segment;
use crate::handlers::HandlerResult;
use crate::http::request::RequestView;
use crate::http::response;
use crate::http::server::AppState;
use crate::introspect::Facet;

const CACHE_FACETS: [Facet; 4] = [Facet::Url, Facet::Args, Facet::Headers, Facet::Origin];

const DEFAULT_MAX_AGE: i64 = 60;

/// True when either validator header carries a non-empty value.
fn is_conditional(headers: &HeaderMap) -> bool {
    [header::IF_MODIFIED_SINCE, header::IF_NONE_MATCH]
        .iter()
        .any(|name| headers.get(name).is_some_and(|v| !v.is_empty()))
}

/// `/cache`: 304 for any conditional request, otherwise the echo.
pub fn conditional(view: &RequestView, state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    if is_conditional(view.headers()) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let doc = state.aggregator.aggregate(view, &CACHE_FACETS);
    let mut res = response::json(&doc)?;
    res.headers_mut()
        .insert(header::LAST_MODIFIED, HeaderValue::from_static(""));
    Ok(res)
}

/// `/cache/{n}`: the echo with `Cache-Control: public, max-age=n`.
pub fn control(view: &RequestView, state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let max_age = segment(view.path(), 2)
        .parse::<i64>()
        .unwrap_or(DEFAULT_MAX_AGE);

    let doc = state.aggregator.aggregate(view, &CACHE_FACETS);
    let mut res = response::json(&doc)?;
    let value = HeaderValue::from_str(&format!("public, max-age={}", max_age))
        .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=60"));
    res.headers_mut().insert(header::CACHE_CONTROL, value);
    Ok(res)
}
