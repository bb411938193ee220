//! End-to-end tests against a real listening socket.
//!
//! Each test starts the server on an ephemeral loopback port and talks to it
//! with reqwest, so the full stack (bind, layers, handlers) is exercised.
//!
//! Run with: cargo test --test server_tests

use std::net::{SocketAddr, TcpListener};
use std::time::Duration;

use axum_server::Handle;
use chrono::{DateTime, Utc};
use renovate_demo::http::{serve, ServerError};
use renovate_demo::{create_router, AppState};
use serde_json::Value;

/// A running server bound to 127.0.0.1 on an OS-assigned port.
struct TestServer {
    base_url: String,
    handle: Handle,
}

impl TestServer {
    async fn start() -> Self {
        let handle = Handle::new();
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let app = create_router(AppState::new());

        let server_handle = handle.clone();
        tokio::spawn(async move {
            if let Err(e) = serve(app, addr, server_handle).await {
                eprintln!("[test] server exited with error: {e}");
            }
        });

        let local = tokio::time::timeout(Duration::from_secs(5), handle.listening())
            .await
            .expect("server did not start within 5 seconds")
            .expect("server failed to bind");

        Self {
            base_url: format!("http://{}", local),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

fn assert_shaping_headers(response: &reqwest::Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn root_returns_version_and_recent_timestamp() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_shaping_headers(&response);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["version"], "1.0.0");
    assert!(body["message"].is_string());

    let timestamp = DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).unwrap();
    let skew = (Utc::now() - timestamp.with_timezone(&Utc)).num_seconds().abs();
    assert!(skew < 5, "timestamp skew {skew}s");
}

#[tokio::test]
async fn health_uptime_is_monotonic() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let first: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    let second: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first["status"], "healthy");
    assert_eq!(second["status"], "healthy");

    let first_uptime = first["uptime"].as_f64().unwrap();
    let second_uptime = second["uptime"].as_f64().unwrap();
    assert!(first_uptime >= 0.0);
    assert!(second_uptime >= first_uptime);
}

#[tokio::test]
async fn concurrent_health_checks_are_independent() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let (a, b) = tokio::join!(
        client.get(server.url("/health")).send(),
        client.get(server.url("/health")).send(),
    );

    for response in [a.unwrap(), b.unwrap()] {
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert!(DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
    }
}

#[tokio::test]
async fn unknown_path_is_not_found_with_headers() {
    let server = TestServer::start().await;

    let response = reqwest::get(server.url("/nonexistent")).await.unwrap();
    assert_eq!(response.status(), 404);
    assert_shaping_headers(&response);
}

#[tokio::test]
async fn malformed_json_body_does_not_crash_server() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    for path in ["/", "/health", "/nonexistent"] {
        let response = client
            .post(server.url(path))
            .header("content-type", "application/json")
            .body("{ this is not json")
            .send()
            .await
            .unwrap();
        assert!(
            response.status().is_client_error(),
            "{path} returned {}",
            response.status()
        );
        assert_shaping_headers(&response);
    }

    // Still serving afterwards
    let response = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn occupied_port_fails_to_bind() {
    let blocker = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = blocker.local_addr().unwrap();

    let result = serve(create_router(AppState::new()), addr, Handle::new()).await;
    assert!(matches!(result, Err(ServerError::Bind(_))));
}
