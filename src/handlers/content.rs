//! Static pages and the external image redirects.

use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;

use crate::handlers::error::{allow, HandlerError};
use crate::handlers::params::tail;
use crate::handlers::HandlerResult;
use crate::http::request::RequestView;
use crate::http::response;
use crate::http::server::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const UTF8_HTML: &str = include_str!("../../assets/utf8.html");
const SAMPLE_HTML: &str = include_str!("../../assets/sample.html");
const FORMS_HTML: &str = include_str!("../../assets/forms.html");
const SAMPLE_XML: &str = include_str!("../../assets/sample.xml");
const ROBOTS_TXT: &str = include_str!("../../assets/robots.txt");
const DENY_TXT: &str = include_str!("../../assets/deny.txt");

const IMAGE_FORMATS: [&str; 4] = ["png", "jpeg", "webp", "svg"];

pub fn index(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;
    Ok(response::html(INDEX_HTML))
}

pub fn utf8(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;
    Ok(response::html(UTF8_HTML))
}

pub fn html(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;
    Ok(response::html(SAMPLE_HTML))
}

pub fn forms(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;
    Ok(response::html(FORMS_HTML))
}

pub fn xml(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], SAMPLE_XML).into_response())
}

pub fn robots(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;
    Ok(response::text(ROBOTS_TXT))
}

pub fn deny(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;
    Ok(response::text(DENY_TXT))
}

/// `/image` and `/image/{format}`: redirect to the configured image origin.
pub fn image(view: &RequestView, state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let path = view.path();
    if path != "/image" && !IMAGE_FORMATS.contains(&tail(path, "/image/")) {
        return Err(HandlerError::NotFound);
    }

    let upstream = state.config.images.upstream.trim_end_matches('/');
    Ok(response::redirect(&format!("{}{}", upstream, path), StatusCode::FOUND))
}
