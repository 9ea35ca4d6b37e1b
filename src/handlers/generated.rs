//! Endpoints that generate their payload: streams, random bytes, link pages.

use std::convert::Infallible;
use std::fmt::Write;

use axum::body::{Body, Bytes};
use axum::http::{header, Method};
use axum::response::IntoResponse;

use crate::handlers::error::allow;
use crate::handlers::params::{clamped, segment};
use crate::handlers::HandlerResult;
use crate::http::request::RequestView;
use crate::http::response;
use crate::http::server::AppState;
use crate::introspect::Facet;

pub const MAX_STREAM_LINES: u64 = 100;
pub const MAX_BYTES: u64 = 100 * 1024;
pub const MAX_LINKS: u64 = 200;

const STREAM_FACETS: [Facet; 4] = [Facet::Url, Facet::Args, Facet::Headers, Facet::Origin];

/// `/stream/{n}`: `n` newline-delimited copies of the request echo.
pub fn stream(view: &RequestView, state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let n = clamped(segment(view.path(), 2), 20, MAX_STREAM_LINES);
    let doc = state.aggregator.aggregate(view, &STREAM_FACETS);
    let mut line = serde_json::to_vec(&doc)?;
    line.push(b'\n');
    let line = Bytes::from(line);

    let chunks = futures_util::stream::iter((0..n).map(move |_| Ok::<_, Infallible>(line.clone())));
    Ok((
        [(header::CONTENT_TYPE, response::APPLICATION_JSON)],
        Body::from_stream(chunks),
    )
        .into_response())
}

/// `/bytes/{n}`: `n` random bytes (at most 100 KiB).
pub fn bytes(view: &RequestView, state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let n = clamped(segment(view.path(), 2), 1024, MAX_BYTES) as usize;
    let mut buf = vec![0u8; n];
    state.bytes.fill(&mut buf);

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], buf).into_response())
}

/// `/links/{n}/{offset}`: an HTML page of `n` links to its siblings.
pub fn links(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let n = clamped(segment(view.path(), 2), 10, MAX_LINKS);
    Ok(response::html(link_page(n)))
}

fn link_page(n: u64) -> String {
    let mut html = String::from("<html><head><title>Links</title></head><body>");
    for i in 0..n {
        // Writing to a String cannot fail.
        let _ = write!(html, "<a href='/links/{n}/{i}'>{i}</a> ");
    }
    html.push_str("</body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_page() {
        let page = link_page(3);
        assert_eq!(page.matches("<a ").count(), 3);
        for i in 0..3 {
            assert!(page.contains(&format!("href='/links/3/{i}'")));
        }
        assert!(page.starts_with("<html>"));
        assert!(page.ends_with("</body></html>"));
    }

    #[test]
    fn test_empty_link_page() {
        assert_eq!(link_page(0), "<html><head><title>Links</title></head><body></body></html>");
    }
}
