//! Response construction helpers.
//!
//! # Responsibilities
//! - Build plain-text error responses in the host stack's format
//! - Build redirects (status, `Location`, short HTML body)
//! - Serialize response documents as JSON
//!
//! # Design Decisions
//! - Error bodies end with a newline and carry `X-Content-Type-Options: nosniff`
//! - Redirects carry a short HTML anchor body alongside `Location`

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::introspect::Document;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// Plain-text error with a trailing newline.
pub fn plain_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, TEXT_PLAIN),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        format!("{}\n", message),
    )
        .into_response()
}

/// Response for paths with no registered handler.
pub fn route_not_found() -> Response {
    plain_error(StatusCode::NOT_FOUND, "404 page not found")
}

/// Redirect to `location` with the given status.
///
/// An invalid `Location` value (e.g. containing control characters) is
/// percent-encoded rather than rejected.
pub fn redirect(location: &str, status: StatusCode) -> Response {
    let value = HeaderValue::from_str(location).unwrap_or_else(|_| {
        let encoded: String = url::form_urlencoded::byte_serialize(location.as_bytes()).collect();
        HeaderValue::from_str(&encoded).unwrap_or_else(|_| HeaderValue::from_static("/"))
    });
    let text = status.canonical_reason().unwrap_or("Redirect");
    let body = format!("<a href=\"{}\">{}</a>.\n\n", escape_html(location), text);

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::LOCATION, value);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML));
    response
}

/// Serialize a document as a JSON response.
pub fn json(document: &Document) -> Result<Response, serde_json::Error> {
    let body = document.to_json()?;
    Ok(([(header::CONTENT_TYPE, APPLICATION_JSON)], body).into_response())
}

pub fn text(body: impl Into<Body>) -> Response {
    ([(header::CONTENT_TYPE, TEXT_PLAIN)], body.into()).into_response()
}

pub fn html(body: impl Into<Body>) -> Response {
    ([(header::CONTENT_TYPE, TEXT_HTML)], body.into()).into_response()
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_error_format() {
        let res = plain_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[header::CONTENT_TYPE], TEXT_PLAIN);

        let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"Method Not Allowed\n");
    }

    #[test]
    fn test_redirect_headers() {
        let res = redirect("/get", StatusCode::FOUND);
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers()[header::LOCATION], "/get");
    }

    #[test]
    fn test_redirect_with_unencodable_location() {
        let res = redirect("/bad\nvalue", StatusCode::FOUND);
        assert_eq!(res.headers()[header::LOCATION], "%2Fbad%0Avalue");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href='x'>&"), "&lt;a href=&#39;x&#39;&gt;&amp;");
    }
}
