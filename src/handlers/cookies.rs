//! Cookie introspection and mutation.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::Response;

use crate::handlers::error::allow;
use crate::handlers::params::tail;
use crate::handlers::HandlerResult;
use crate::http::request::RequestView;
use crate::http::response;
use crate::http::server::AppState;
use crate::introspect::Document;

fn cookie_document<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Document {
    let cookies: Document = pairs.into_iter().collect();
    let mut doc = Document::new();
    doc.insert("cookies", cookies);
    doc
}

/// `/cookies`: all request cookies under `cookies`.
pub fn list(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;
    let doc = cookie_document(view.cookies().iter().map(|(k, v)| (k.as_str(), v.as_str())));
    Ok(response::json(&doc)?)
}

/// `/cookies/set`, `/cookies/delete` and everything else under `/cookies/`.
pub fn mutate(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let rest = tail(view.path(), "/cookies/");
    match rest {
        "set" => set(view, view.query().to_vec()),
        "delete" => Ok(delete(view)),
        _ => match rest.strip_prefix("set/").and_then(|p| p.split_once('/')) {
            Some((name, value)) if !name.is_empty() && !value.contains('/') => {
                set(view, vec![(name.to_string(), value.to_string())])
            }
            _ => Ok(response::redirect("/cookies", StatusCode::FOUND)),
        },
    }
}

/// Set each pair and answer with the resulting cookie set.
fn set(view: &RequestView, pairs: Vec<(String, String)>) -> HandlerResult {
    let mut cookies: Document = view
        .cookies()
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let mut set_cookie = Vec::with_capacity(pairs.len());
    for (name, value) in &pairs {
        match HeaderValue::from_str(&format!("{}={}; Path=/", name, value)) {
            Ok(h) if valid_cookie_name(name) && valid_cookie_value(value) => {
                cookies.insert(name.as_str(), value.as_str());
                set_cookie.push(h);
            }
            _ => tracing::debug!(name = %name, "Skipping cookie that cannot be encoded"),
        }
    }

    let mut doc = Document::new();
    doc.insert("cookies", cookies);
    let mut res = response::json(&doc)?;
    append_set_cookie(&mut res, set_cookie);
    Ok(res)
}

/// Expire every cookie named in the query, then redirect to `/cookies`.
fn delete(view: &RequestView) -> Response {
    let expired = view
        .query()
        .iter()
        .filter(|(name, _)| valid_cookie_name(name))
        .filter_map(|(name, _)| {
            HeaderValue::from_str(&format!(
                "{}=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/",
                name
            ))
            .ok()
        })
        .collect();

    let mut res = response::redirect("/cookies", StatusCode::FOUND);
    append_set_cookie(&mut res, expired);
    res
}

fn append_set_cookie(res: &mut Response, values: Vec<HeaderValue>) {
    let headers = res.headers_mut();
    for value in values {
        headers.append(header::SET_COOKIE, value);
    }
}

/// RFC 6265 token: visible ASCII minus separators.
fn valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}

/// RFC 6265 cookie-octets.
fn valid_cookie_value(value: &str) -> bool {
    value
        .bytes()
        .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cookie_name() {
        assert!(valid_cookie_name("session_id"));
        assert!(!valid_cookie_name(""));
        assert!(!valid_cookie_name("a b"));
        assert!(!valid_cookie_name("a;b"));
        assert!(!valid_cookie_name("a=b"));
        assert!(valid_cookie_value("abc-123"));
        assert!(valid_cookie_value(""));
        assert!(!valid_cookie_value("a;b"));
    }

    #[test]
    fn test_cookie_document_shape() {
        let doc = cookie_document([("a", "1"), ("b", "2")]);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            serde_json::json!({"cookies": {"a": "1", "b": "2"}})
        );
    }
}
