//! End-to-end tests over a real TCP listener.

use std::time::{Duration, Instant};

use echo_client::EchoClient;
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use responsive_web::ServerConfig;

mod common;

#[tokio::test]
async fn test_sdk_round_trip() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;
    let client = EchoClient::new(&format!("http://{addr}")).unwrap();

    assert_eq!(client.ip().await.unwrap(), "127.0.0.1");
    assert_eq!(client.uuid().await.unwrap(), "00000000-0000-4000-8000-000000000000");

    let echo = client.get(&[("a", "1"), ("a", "2"), ("b", "x")]).await.unwrap();
    assert_eq!(echo.origin, "127.0.0.1");
    assert_eq!(echo.url, format!("http://{addr}/get?a=1&a=2&b=x"));
    assert_eq!(echo.args["b"].first(), Some("x"));
    assert_eq!(
        echo.args["a"],
        echo_client::MultiValue::Many(vec!["1".into(), "2".into()])
    );

    let headers = client.headers().await.unwrap();
    assert!(headers.headers.contains_key("Host"));

    let res = client.status(418).await.unwrap();
    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(res.headers()["location"], "/status/418");

    assert_eq!(client.bytes(64).await.unwrap(), vec![0xAB; 64]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_response_headers_cannot_override_framing() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(
            b"GET /response-headers?Content-Length=3&Transfer-Encoding=chunked&X-Ok=1 HTTP/1.1\r\n\
              Host: localhost\r\n\
              Connection: close\r\n\r\n",
        )
        .await
        .unwrap();
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8(raw).unwrap();

    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    assert!(head.starts_with("HTTP/1.1 200 OK"), "{head}");
    assert!(head.to_ascii_lowercase().contains("x-ok: 1"));
    assert!(!head.to_ascii_lowercase().contains("transfer-encoding"));

    let length: usize = head
        .lines()
        .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length: ").map(str::to_string))
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    assert_eq!(length, body.len());

    let doc: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(doc["Content-Length"], "3");
    assert_eq!(doc["X-Ok"], "1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_redirect_chain_is_followed_to_get() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;

    let res = reqwest::get(format!("http://{addr}/redirect/4")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.url().path(), "/get");

    shutdown.trigger();
}

#[tokio::test]
async fn test_delay_does_not_block_other_requests() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;
    let client = reqwest::Client::new();

    let start = Instant::now();
    let slow = {
        let client = client.clone();
        tokio::spawn(async move {
            client
                .get(format!("http://{addr}/delay/2"))
                .send()
                .await
                .unwrap()
                .status()
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    let fast = client.get(format!("http://{addr}/ip")).send().await.unwrap();
    assert_eq!(fast.status(), StatusCode::OK);
    assert!(start.elapsed() < Duration::from_secs(2));

    assert_eq!(slow.await.unwrap(), StatusCode::OK);
    assert!(start.elapsed() >= Duration::from_secs(2));

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_requests() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;
    let client = reqwest::Client::new();

    let concurrency = 20;
    let requests_per_task = 10;

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = format!("http://{addr}/anything?task=1");
        tasks.push(tokio::spawn(async move {
            let mut ok = 0;
            for _ in 0..requests_per_task {
                if let Ok(res) = client.post(&url).body("payload").send().await {
                    if res.status().is_success() {
                        ok += 1;
                    }
                }
            }
            ok
        }));
    }

    let mut successes = 0;
    for task in tasks {
        successes += task.await.unwrap();
    }
    assert_eq!(successes, concurrency * requests_per_task);

    shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();

    let res = client.get(format!("http://{addr}/ip")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    shutdown.trigger();

    let mut refused = false;
    for _ in 0..50 {
        if client.get(format!("http://{addr}/ip")).send().await.is_err() {
            refused = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(refused, "server kept accepting after shutdown");
}
