//! Request echo endpoints.
//!
//! Each endpoint is a fixed facet list behind a method check.

use axum::http::{header, HeaderName, HeaderValue, Method};

use crate::handlers::error::allow;
use crate::handlers::HandlerResult;
use crate::http::request::RequestView;
use crate::http::response;
use crate::http::server::AppState;
use crate::introspect::{Document, Facet};

const BODY_FACETS: [Facet; 8] = [
    Facet::Args,
    Facet::Data,
    Facet::Files,
    Facet::Form,
    Facet::Headers,
    Facet::Json,
    Facet::Origin,
    Facet::Url,
];

const ANYTHING_FACETS: [Facet; 9] = [
    Facet::Args,
    Facet::Data,
    Facet::Files,
    Facet::Form,
    Facet::Headers,
    Facet::Json,
    Facet::Origin,
    Facet::Url,
    Facet::Method,
];

fn echo(view: &RequestView, state: &AppState, method: Method, facets: &[Facet]) -> HandlerResult {
    allow(view, &[method])?;
    let doc = state.aggregator.aggregate(view, facets);
    Ok(response::json(&doc)?)
}

pub fn ip(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(view, state, Method::GET, &[Facet::Origin])
}

pub fn headers(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(view, state, Method::GET, &[Facet::Headers])
}

pub fn user_agent(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(view, state, Method::GET, &[Facet::UserAgent])
}

pub fn uuid(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(view, state, Method::GET, &[Facet::Uuid])
}

pub fn get(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(
        view,
        state,
        Method::GET,
        &[Facet::Args, Facet::Headers, Facet::Origin, Facet::Url],
    )
}

pub fn post(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(view, state, Method::POST, &BODY_FACETS)
}

pub fn put(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(view, state, Method::PUT, &BODY_FACETS)
}

pub fn patch(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(view, state, Method::PATCH, &BODY_FACETS)
}

pub fn delete(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(view, state, Method::DELETE, &BODY_FACETS)
}

/// Any method.
pub fn anything(view: &RequestView, state: &AppState) -> HandlerResult {
    let doc = state.aggregator.aggregate(view, &ANYTHING_FACETS);
    Ok(response::json(&doc)?)
}

pub fn gzip(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(
        view,
        state,
        Method::GET,
        &[Facet::Gzipped, Facet::Headers, Facet::Method, Facet::Origin],
    )
}

pub fn deflate(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(
        view,
        state,
        Method::GET,
        &[Facet::Deflated, Facet::Headers, Facet::Method, Facet::Origin],
    )
}

pub fn brotli(view: &RequestView, state: &AppState) -> HandlerResult {
    echo(
        view,
        state,
        Method::GET,
        &[Facet::Brotli, Facet::Headers, Facet::Method, Facet::Origin],
    )
}

/// Headers owned by the connection layer; setting them would break framing.
fn is_framing_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "content-length"
            | "transfer-encoding"
            | "connection"
            | "upgrade"
            | "te"
            | "trailer"
            | "keep-alive"
    )
}

/// Echo query parameters as a document and as response headers.
///
/// Framing and hop-by-hop names stay in the document only.
pub fn response_headers(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET, Method::POST])?;

    let mut doc = Document::new();
    for (k, v) in view.query() {
        doc.append(k.as_str(), v.as_str());
    }
    doc.insert("Content-Type", response::APPLICATION_JSON);

    let mut res = response::json(&doc)?;
    let headers = res.headers_mut();
    for (k, v) in view.query() {
        let name = HeaderName::try_from(k.as_str());
        let (Ok(name), Ok(value)) = (name, HeaderValue::from_str(v)) else {
            tracing::debug!(name = %k, "Skipping query parameter that is not a valid header");
            continue;
        };
        if is_framing_header(&name) {
            tracing::debug!(name = %k, "Not emitting connection-level header");
            continue;
        }
        headers.append(name, value);
    }
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(response::APPLICATION_JSON),
    );
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framing_headers_are_recognized() {
        for name in ["Content-Length", "transfer-encoding", "Connection", "Keep-Alive", "TE"] {
            assert!(is_framing_header(&HeaderName::try_from(name).unwrap()), "{name}");
        }
        assert!(!is_framing_header(&header::CACHE_CONTROL));
        assert!(!is_framing_header(&HeaderName::from_static("x-test")));
    }
}
