//! Status and redirect endpoints.

use axum::http::{Method, StatusCode};

use crate::handlers::error::allow;
use crate::handlers::params::tail;
use crate::handlers::HandlerResult;
use crate::http::request::RequestView;
use crate::http::response;
use crate::http::server::AppState;

/// Parse a final (non-1xx) status code in `200..=999`.
fn status_code(raw: &str) -> Option<StatusCode> {
    raw.parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .filter(|code| !code.is_informational())
}

/// `/status/{code}`: respond with `code`, pointing `Location` back at itself.
///
/// Any method. Codes that do not parse (or are 0) become 418.
pub fn status(view: &RequestView, _state: &AppState) -> HandlerResult {
    let code = status_code(tail(view.path(), "/status/")).unwrap_or(StatusCode::IM_A_TEAPOT);
    Ok(response::redirect(&format!("/status/{}", code.as_u16()), code))
}

/// `/redirect/{n}`: a chain of `n` redirects ending at `/get`.
///
/// `n > 1` points at `/redirect/{n-1}`; `0` and `1` both redirect straight
/// to `/get`. Negative or unparseable `n` is answered with `Invalid n`.
pub fn redirect_multi(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let n = match tail(view.path(), "/redirect/").parse::<i64>() {
        Ok(n) if n >= 0 => n,
        _ => return Ok(response::text("Invalid n")),
    };

    let location = if n > 1 {
        format!("/redirect/{}", n - 1)
    } else {
        "/get".to_string()
    };
    Ok(response::redirect(&location, StatusCode::FOUND))
}

/// `/redirect-to?url=&status_code=`: one redirect to an arbitrary URL.
pub fn redirect_to(view: &RequestView, _state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let location = view.query_param("url").filter(|u| !u.is_empty()).unwrap_or("/");
    let status = view
        .query_param("status_code")
        .and_then(status_code)
        .unwrap_or(StatusCode::FOUND);

    Ok(response::redirect(location, status))
}
