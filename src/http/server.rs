//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with one catch-all route
//! - Wire up middleware (tracing, timeout, body limit)
//! - Dispatch every request through the endpoint `RouteTable`
//! - Record per-request metrics
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::entropy::{ByteSource, IdGenerator, RandomUuid, ThreadRngBytes};
use crate::handlers::{self, Handler};
use crate::http::request::RequestView;
use crate::http::response;
use crate::introspect::Aggregator;
use crate::lifecycle::shutdown;
use crate::observability::{metrics, tracing::make_span};
use crate::routing::RouteTable;
use crate::security::credentials::{CredentialStore, StaticCredentials};

/// Application state injected into the dispatcher and handlers.
///
/// Everything behind it is immutable; cloning is a handful of `Arc` bumps.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
    pub credentials: Arc<dyn CredentialStore>,
    pub bytes: Arc<dyn ByteSource>,
    pub config: Arc<ServerConfig>,
    pub routes: Arc<RouteTable<Handler>>,
}

impl AppState {
    /// Default collaborators: v4 UUIDs, thread RNG, credentials from config.
    pub fn new(config: ServerConfig) -> Self {
        let credentials = StaticCredentials::new(config.auth.credentials.clone());
        Self {
            aggregator: Aggregator::new(Arc::new(RandomUuid)),
            credentials: Arc::new(credentials),
            bytes: Arc::new(ThreadRngBytes),
            config: Arc::new(config),
            routes: Arc::new(handlers::route_table()),
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.aggregator = Aggregator::new(ids);
        self
    }

    pub fn with_byte_source(mut self, bytes: Arc<dyn ByteSource>) -> Self {
        self.bytes = bytes;
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("routes", &self.routes.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// HTTP server for the echo endpoints.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
}

impl HttpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self::with_state(AppState::new(config))
    }

    /// Build the server around caller-supplied state (custom collaborators).
    pub fn with_state(state: AppState) -> Self {
        let config = state.config.clone();
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(DefaultBodyLimit::max(config.limits.max_body_size))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::triggered(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler: route lookup, view construction, handler call.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let Some(route) = state.routes.lookup(&path) else {
        tracing::debug!(path = %path, "No route matched");
        metrics::record_request(&method, 404, "none", start);
        return response::route_not_found();
    };
    let pattern = route.pattern.as_str().to_string();
    let handler = *route.handler;

    let view = match RequestView::from_request(request, state.config.limits.max_body_size).await {
        Ok(view) => view,
        Err(e) => {
            tracing::warn!(error = %e, path = %path, "Rejected request body");
            let res = e.into_response();
            metrics::record_request(&method, res.status().as_u16(), &pattern, start);
            return res;
        }
    };

    let res = handler.call(view, state).await;
    let status = res.status();
    if status.is_server_error() {
        tracing::error!(status = %status, route = %pattern, "Handler failed");
    } else {
        tracing::debug!(status = %status, route = %pattern, "Request handled");
    }
    metrics::record_request(&method, status.as_u16(), &pattern, start);
    res
}
