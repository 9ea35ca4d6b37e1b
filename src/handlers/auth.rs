//! Basic-auth endpoints.
//!
//! Credentials come from the path (`/basic-auth/{user}/{pass}`) and are
//! checked against the configured [`CredentialStore`].

use axum::http::{header, HeaderValue, Method};
use axum::response::{IntoResponse, Response};

use crate::handlers::error::{allow, HandlerError};
use crate::handlers::params::tail;
use crate::handlers::HandlerResult;
use crate::http::request::RequestView;
use crate::http::response;
use crate::http::server::AppState;
use crate::introspect::Document;
use crate::security::CredentialStore;

fn authenticated(user: &str) -> Document {
    let mut doc = Document::new();
    doc.insert("authenticated", true);
    doc.insert("user", user);
    doc
}

/// Split `user/pass`. Anything but exactly one separator is malformed.
fn split_credentials(rest: &str) -> Result<(&str, &str), HandlerError> {
    if rest.matches('/').count() != 1 {
        return Err(HandlerError::NotFound);
    }
    rest.split_once('/').ok_or(HandlerError::NotFound)
}

fn verify<'a>(rest: &'a str, store: &dyn CredentialStore) -> Result<&'a str, HandlerError> {
    let (user, pass) = split_credentials(rest)?;
    if !store.verify(user, pass) {
        tracing::info!(user = %user, "Rejected basic-auth attempt");
        return Err(HandlerError::Unauthorized);
    }
    Ok(user)
}

fn with_challenge(mut res: Response, realm: &str) -> Response {
    match HeaderValue::from_str(&format!("Basic realm=\"{}\"", realm)) {
        Ok(value) => {
            res.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }
        Err(_) => tracing::warn!(realm = %realm, "Realm is not a valid header value"),
    }
    res
}

/// `/basic-auth/{user}/{pass}`.
///
/// A bare `/basic-auth` answers as authenticated without any check while
/// `auth.open_base_path` is set.
pub fn basic_auth(view: &RequestView, state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let path = view.path();
    if state.config.auth.open_base_path && (path == "/basic-auth" || path == "/basic-auth/") {
        return Ok(response::json(&authenticated(""))?);
    }

    let outcome = verify(tail(path, "/basic-auth/"), state.credentials.as_ref()).and_then(|user| {
        tracing::info!(user = %user, "User logged in");
        Ok(response::json(&authenticated(user))?)
    });

    let res = outcome.unwrap_or_else(IntoResponse::into_response);
    Ok(with_challenge(res, &state.config.auth.realm))
}

/// `/hidden-basic-auth/{user}/{pass}`: 404 unless the credentials are wrong.
///
/// Valid credentials still produce 404 so the resource never shows up.
pub fn hidden_basic_auth(view: &RequestView, state: &AppState) -> HandlerResult {
    allow(view, &[Method::GET])?;

    let err = match verify(tail(view.path(), "/hidden-basic-auth/"), state.credentials.as_ref()) {
        Ok(user) => {
            tracing::info!(user = %user, "User logged in (hidden)");
            HandlerError::NotFound
        }
        Err(e) => e,
    };

    Ok(with_challenge(err.into_response(), &state.config.auth.realm))
}
