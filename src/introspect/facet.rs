//! Facet extraction.
//!
//! A facet is one named piece of information derivable from a request.
//! Every facet except `uuid` is a pure function of the [`RequestView`].

use axum::http::header;
use base64::Engine;

use crate::entropy::IdGenerator;
use crate::http::request::RequestView;
use crate::introspect::document::{Document, Value};

/// Known facet names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Origin,
    Headers,
    Args,
    Url,
    UserAgent,
    Uuid,
    Data,
    Files,
    Form,
    Json,
    Method,
    Gzipped,
    Deflated,
    Brotli,
}

impl Facet {
    pub const ALL: [Facet; 14] = [
        Facet::Origin,
        Facet::Headers,
        Facet::Args,
        Facet::Url,
        Facet::UserAgent,
        Facet::Uuid,
        Facet::Data,
        Facet::Files,
        Facet::Form,
        Facet::Json,
        Facet::Method,
        Facet::Gzipped,
        Facet::Deflated,
        Facet::Brotli,
    ];

    /// Key used in the response document.
    pub fn name(self) -> &'static str {
        match self {
            Facet::Origin => "origin",
            Facet::Headers => "headers",
            Facet::Args => "args",
            Facet::Url => "url",
            Facet::UserAgent => "user-agent",
            Facet::Uuid => "uuid",
            Facet::Data => "data",
            Facet::Files => "files",
            Facet::Form => "form",
            Facet::Json => "json",
            Facet::Method => "method",
            Facet::Gzipped => "gzipped",
            Facet::Deflated => "deflated",
            Facet::Brotli => "brotli",
        }
    }
}

/// Produce the value of one facet for `view`.
pub fn extract(view: &RequestView, facet: Facet, ids: &dyn IdGenerator) -> Value {
    match facet {
        Facet::Origin => Value::Text(origin(view)),
        Facet::Headers => Value::Map(headers(view)),
        Facet::Args => Value::Map(pairs(view.query())),
        Facet::Url => Value::Text(full_url(view)),
        Facet::UserAgent => view
            .header(header::USER_AGENT)
            .map(Value::from)
            .unwrap_or(Value::Null),
        Facet::Uuid => Value::Text(ids.generate()),
        Facet::Data => {
            let text = std::str::from_utf8(view.body()).unwrap_or_default();
            Value::Text(text.to_string())
        }
        Facet::Files => Value::Map(files(view)),
        Facet::Form => Value::Map(pairs(view.form())),
        Facet::Json => json_body(view),
        Facet::Method => Value::Text(view.method().to_string()),
        // Advisory markers only; nothing is actually encoded.
        Facet::Gzipped | Facet::Deflated | Facet::Brotli => Value::Bool(true),
    }
}

fn origin(view: &RequestView) -> String {
    view.remote_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default()
}

fn headers(view: &RequestView) -> Document {
    let mut doc = Document::new();
    for (name, value) in view.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        doc.append(canonical_header_name(name.as_str()), value);
    }
    doc
}

fn pairs(items: &[(String, String)]) -> Document {
    let mut doc = Document::new();
    for (k, v) in items {
        doc.append(k.as_str(), v.as_str());
    }
    doc
}

fn full_url(view: &RequestView) -> String {
    let host = view
        .header(header::HOST)
        .map(str::to_string)
        .or_else(|| view.uri().authority().map(|a| a.to_string()))
        .unwrap_or_else(|| "localhost".to_string());
    let path_and_query = view
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("http://{}{}", host, path_and_query)
}

fn files(view: &RequestView) -> Document {
    let mut doc = Document::new();
    for file in view.files() {
        let content = match std::str::from_utf8(&file.content) {
            Ok(text) => text.to_string(),
            Err(_) => format!(
                "data:{};base64,{}",
                file.content_type.as_deref().unwrap_or("application/octet-stream"),
                base64::engine::general_purpose::STANDARD.encode(&file.content)
            ),
        };
        doc.append(file.field.as_str(), content);
    }
    doc
}

fn json_body(view: &RequestView) -> Value {
    let body = view.body();
    let looks_like_json = body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|b| *b == b'{' || *b == b'[')
        .unwrap_or(false);

    if !view.is_json() && !looks_like_json {
        return Value::Null;
    }

    serde_json::from_slice(body)
        .map(Value::Json)
        .unwrap_or(Value::Null)
}

/// `content-type` → `Content-Type`.
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper = c == '-';
    }
    out
}
