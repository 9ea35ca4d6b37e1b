//! Request snapshot taken before dispatching to a handler.
//!
//! # Responsibilities
//! - Buffer the body (bounded by the configured limit)
//! - Parse query string, URL-encoded and multipart forms, cookies
//! - Record the peer address reported by the transport
//!
//! # Design Decisions
//! - The view is immutable once built; handlers only read from it
//! - Repeated names keep first-seen order
//! - A malformed multipart body leaves `form`/`files` empty instead of failing

use std::net::SocketAddr;

use axum::{
    body::{Body, Bytes},
    extract::{connect_info::MockConnectInfo, ConnectInfo, FromRequest, Multipart},
    http::{header, Extensions, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use url::form_urlencoded;

use crate::http::response;

/// Errors raised while building a [`RequestView`].
#[derive(Debug, Error)]
pub enum RequestError {
    /// Declared body length exceeds the configured limit.
    #[error("request body of {length} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { length: u64, limit: usize },

    /// The body stream failed or overflowed while buffering.
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self {
            RequestError::BodyTooLarge { .. } => {
                response::plain_error(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
            }
            RequestError::Body(_) => response::plain_error(StatusCode::BAD_REQUEST, "Bad Request"),
        }
    }
}

#[derive(Debug, Error)]
enum MultipartFailure {
    #[error(transparent)]
    Rejection(#[from] axum::extract::multipart::MultipartRejection),
    #[error(transparent)]
    Field(#[from] axum::extract::multipart::MultipartError),
}

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub content: Bytes,
}

/// Read-only snapshot of an inbound request.
#[derive(Debug, Clone)]
pub struct RequestView {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    remote_addr: Option<SocketAddr>,
    body: Bytes,
    query: Vec<(String, String)>,
    form: Vec<(String, String)>,
    files: Vec<UploadedFile>,
    cookies: Vec<(String, String)>,
}

impl RequestView {
    /// Consume the request, buffering at most `body_limit` bytes of body.
    pub async fn from_request(
        request: Request<Body>,
        body_limit: usize,
    ) -> Result<Self, RequestError> {
        let extensions = request.extensions();
        let remote_addr = extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
            .or_else(|| extensions.get::<MockConnectInfo<SocketAddr>>().map(|m| m.0));

        let (parts, body) = request.into_parts();

        if let Some(length) = content_length(&parts.headers) {
            if length > body_limit as u64 {
                return Err(RequestError::BodyTooLarge { length, limit: body_limit });
            }
        }

        let body = axum::body::to_bytes(body, body_limit)
            .await
            .map_err(RequestError::Body)?;

        let query = parts
            .uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        let cookies = parse_cookies(&parts.headers);

        let (form, files) = match parts.headers.get(header::CONTENT_TYPE) {
            Some(ct) if mime_is(ct, "application/x-www-form-urlencoded") => {
                (form_urlencoded::parse(&body).into_owned().collect(), Vec::new())
            }
            Some(ct) if mime_is(ct, "multipart/form-data") => {
                match parse_multipart(ct, body.clone(), &parts.extensions).await {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        tracing::warn!(error = %e, "Ignoring malformed multipart body");
                        (Vec::new(), Vec::new())
                    }
                }
            }
            _ => (Vec::new(), Vec::new()),
        };

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            remote_addr,
            body,
            query,
            form,
            files,
            cookies,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and valid visible ASCII.
    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn form(&self) -> &[(String, String)] {
        &self.form
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    /// True when the declared content type is JSON (`application/json`, `*+json`).
    pub fn is_json(&self) -> bool {
        self.header(header::CONTENT_TYPE)
            .map(|ct| {
                let essence = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
                essence == "application/json" || essence.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn mime_is(value: &HeaderValue, essence: &str) -> bool {
    value
        .to_str()
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case(essence)
        })
        .unwrap_or(false)
}

/// Parse every `Cookie` header into `(name, value)` pairs.
fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches('"');
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Parse an already-buffered multipart body.
///
/// The original request's extensions are carried over so the extractor sees
/// the router's `DefaultBodyLimit` instead of axum's built-in 2 MiB cap.
async fn parse_multipart(
    content_type: &HeaderValue,
    body: Bytes,
    extensions: &Extensions,
) -> Result<(Vec<(String, String)>, Vec<UploadedFile>), MultipartFailure> {
    let mut request = Request::new(Body::from(body));
    *request.extensions_mut() = extensions.clone();
    request
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type.clone());

    let mut multipart = Multipart::from_request(request, &()).await?;
    let mut form = Vec::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let content = field.bytes().await?;

        if filename.is_some() {
            files.push(UploadedFile {
                field: name,
                filename,
                content_type,
                content,
            });
        } else {
            form.push((name, String::from_utf8_lossy(&content).into_owned()));
        }
    }

    Ok((form, files))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> axum::http::request::Builder {
        Request::builder().uri(uri)
    }

    #[tokio::test]
    async fn test_query_and_cookies() {
        let req = request("/get?a=1&b=2&a=3")
            .header("Cookie", "k1=v1; k2=\"v2\"")
            .header("Cookie", "k3=v3")
            .body(Body::empty())
            .unwrap();

        let view = RequestView::from_request(req, 1024).await.unwrap();
        assert_eq!(
            view.query(),
            &[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "3".to_string()),
            ]
        );
        assert_eq!(view.query_param("a"), Some("1"));
        assert_eq!(view.cookies().len(), 3);
        assert_eq!(view.cookies()[1], ("k2".to_string(), "v2".to_string()));
    }

    #[tokio::test]
    async fn test_urlencoded_form() {
        let req = request("/post")
            .method("POST")
            .header("Content-Type", "application/x-www-form-urlencoded; charset=utf-8")
            .body(Body::from("name=alice&lang=rust+lang"))
            .unwrap();

        let view = RequestView::from_request(req, 1024).await.unwrap();
        assert_eq!(view.form()[0], ("name".to_string(), "alice".to_string()));
        assert_eq!(view.form()[1], ("lang".to_string(), "rust lang".to_string()));
        assert!(view.files().is_empty());
    }

    #[tokio::test]
    async fn test_multipart_form_and_files() {
        let body = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"comment\"\r\n\r\n\
            hello\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"upload\"; filename=\"a.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            file body\r\n\
            --XYZ--\r\n";
        let req = request("/post")
            .method("POST")
            .header("Content-Type", "multipart/form-data; boundary=XYZ")
            .body(Body::from(body))
            .unwrap();

        let view = RequestView::from_request(req, 4096).await.unwrap();
        assert_eq!(view.form(), &[("comment".to_string(), "hello".to_string())]);
        assert_eq!(view.files().len(), 1);
        assert_eq!(view.files()[0].field, "upload");
        assert_eq!(view.files()[0].filename.as_deref(), Some("a.txt"));
        assert_eq!(&view.files()[0].content[..], b"file body");
    }

    #[tokio::test]
    async fn test_malformed_multipart_is_ignored() {
        let req = request("/post")
            .method("POST")
            .header("Content-Type", "multipart/form-data")
            .body(Body::from("garbage"))
            .unwrap();

        let view = RequestView::from_request(req, 1024).await.unwrap();
        assert!(view.form().is_empty());
        assert!(view.files().is_empty());
        assert_eq!(&view.body()[..], b"garbage");
    }

    #[tokio::test]
    async fn test_declared_length_over_limit() {
        let req = request("/post")
            .method("POST")
            .header("Content-Length", "2048")
            .body(Body::from(vec![0u8; 2048]))
            .unwrap();

        let err = RequestView::from_request(req, 1024).await.unwrap_err();
        assert!(matches!(err, RequestError::BodyTooLarge { length: 2048, limit: 1024 }));
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_json_content_type_detection() {
        let req = request("/post")
            .header("Content-Type", "application/vnd.api+json; charset=utf-8")
            .body(Body::empty())
            .unwrap();
        let view = RequestView::from_request(req, 16).await.unwrap();
        assert!(view.is_json());
    }
}
