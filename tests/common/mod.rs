//! Shared utilities for router-level and integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, Response},
    Router,
};
use tower::ServiceExt;

use responsive_web::entropy::{ByteSource, IdGenerator};
use responsive_web::{AppState, HttpServer, ServerConfig, Shutdown};

pub const PEER: &str = "203.0.113.5:4711";

/// Always returns the same id.
pub struct FixedId(pub &'static str);

impl IdGenerator for FixedId {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

/// Fills every buffer with one byte value.
pub struct ConstantBytes(pub u8);

impl ByteSource for ConstantBytes {
    fn fill(&self, buf: &mut [u8]) {
        buf.fill(self.0);
    }
}

pub fn test_state(config: ServerConfig) -> AppState {
    AppState::new(config)
        .with_id_generator(Arc::new(FixedId("00000000-0000-4000-8000-000000000000")))
        .with_byte_source(Arc::new(ConstantBytes(0xAB)))
}

/// Router with deterministic collaborators and a fixed peer address.
pub fn test_router(config: ServerConfig) -> Router {
    let peer: SocketAddr = PEER.parse().unwrap();
    HttpServer::with_state(test_state(config))
        .router()
        .layer(MockConnectInfo(peer))
}

pub fn default_router() -> Router {
    test_router(ServerConfig::default())
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    send(router, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// Bind an ephemeral port and serve until the returned `Shutdown` fires.
pub async fn spawn_server(config: ServerConfig) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::with_state(test_state(config));
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    wait_until_listening(addr).await;
    (addr, shutdown)
}

async fn wait_until_listening(addr: SocketAddr) {
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("server at {addr} did not start");
}
