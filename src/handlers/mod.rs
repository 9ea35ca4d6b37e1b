//! Endpoint handlers and their route registrations.
//!
//! # Data Flow
//! ```text
//! dispatcher (http/server.rs)
//!     → RouteTable lookup (path only)
//!     → Handler::call
//!         → method check (405 inside the handler)
//!         → parameter parsing with defaults/clamps (params.rs)
//!         → Aggregator → Document → JSON, or a fixed payload
//! ```
//!
//! # Design Decisions
//! - Handlers are plain function pointers; the table is built once
//! - Only `/delay` awaits; every other handler is synchronous
//! - Early exits are `HandlerError`s rendered by `IntoResponse`

pub mod auth;
pub mod cache;
pub mod content;
pub mod cookies;
pub mod echo;
pub mod error;
pub mod generated;
pub mod params;
pub mod redirects;
pub mod timing;

use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

use crate::http::request::RequestView;
use crate::http::server::AppState;
use crate::routing::RouteTable;

pub use error::HandlerError;

pub type HandlerResult = Result<Response, HandlerError>;

/// Synchronous handler borrowing the request.
pub type ImmediateFn = fn(&RequestView, &AppState) -> HandlerResult;

/// Handler that suspends before answering.
pub type DeferredFn = fn(RequestView, AppState) -> BoxFuture<'static, HandlerResult>;

#[derive(Clone, Copy)]
pub enum Handler {
    Immediate(ImmediateFn),
    Deferred(DeferredFn),
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Handler::Immediate(_) => f.write_str("Handler::Immediate"),
            Handler::Deferred(_) => f.write_str("Handler::Deferred"),
        }
    }
}

impl Handler {
    pub async fn call(self, view: RequestView, state: AppState) -> Response {
        let result = match self {
            Handler::Immediate(f) => f(&view, &state),
            Handler::Deferred(f) => f(view, state).await,
        };
        result.unwrap_or_else(IntoResponse::into_response)
    }
}

/// The full endpoint catalogue.
pub fn route_table() -> RouteTable<Handler> {
    use Handler::{Deferred, Immediate};

    RouteTable::builder()
        .exact("/", Immediate(content::index))
        .exact("/ip", Immediate(echo::ip))
        .exact("/headers", Immediate(echo::headers))
        .exact("/get", Immediate(echo::get))
        .exact("/user-agent", Immediate(echo::user_agent))
        .exact("/uuid", Immediate(echo::uuid))
        .exact("/post", Immediate(echo::post))
        .exact("/delete", Immediate(echo::delete))
        .exact("/put", Immediate(echo::put))
        .exact("/patch", Immediate(echo::patch))
        .exact("/anything", Immediate(echo::anything))
        .prefix("/anything/", Immediate(echo::anything))
        .exact("/encoding/utf8", Immediate(content::utf8))
        .exact("/gzip", Immediate(echo::gzip))
        .exact("/deflate", Immediate(echo::deflate))
        .exact("/brotli", Immediate(echo::brotli))
        .prefix("/status/", Immediate(redirects::status))
        .exact("/response-headers", Immediate(echo::response_headers))
        .prefix("/redirect/", Immediate(redirects::redirect_multi))
        .exact("/redirect-to", Immediate(redirects::redirect_to))
        .exact("/cookies", Immediate(cookies::list))
        .prefix("/cookies/", Immediate(cookies::mutate))
        .exact("/basic-auth", Immediate(auth::basic_auth))
        .prefix("/basic-auth/", Immediate(auth::basic_auth))
        .exact("/hidden-basic-auth", Immediate(auth::hidden_basic_auth))
        .prefix("/hidden-basic-auth/", Immediate(auth::hidden_basic_auth))
        .prefix("/stream/", Immediate(generated::stream))
        .prefix("/delay/", Deferred(timing::delay))
        .exact("/html", Immediate(content::html))
        .exact("/robots.txt", Immediate(content::robots))
        .exact("/deny", Immediate(content::deny))
        .exact("/cache", Immediate(cache::conditional))
        .prefix("/cache/", Immediate(cache::control))
        .prefix("/bytes/", Immediate(generated::bytes))
        .prefix("/links/", Immediate(generated::links))
        .exact("/image", Immediate(content::image))
        .prefix("/image/", Immediate(content::image))
        .exact("/forms/post", Immediate(content::forms))
        .exact("/xml", Immediate(content::xml))
        .build()
}
