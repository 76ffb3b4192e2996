//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    Router,
};
use tokio::net::TcpListener;

/// One request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Log = Arc<Mutex<Vec<Recorded>>>;

#[derive(Clone)]
struct Backend {
    log: Log,
    status: StatusCode,
    body: &'static str,
    delay: Duration,
}

async fn record(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    backend.log.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });
    tokio::time::sleep(backend.delay).await;
    let body = backend
        .body
        .replace("{method}", method.as_str())
        .replace("{uri}", &uri.to_string());
    (backend.status, body)
}

/// Start a mock backend on an ephemeral port that records every request and
/// answers with `status` and `body` (`{method}` and `{uri}` are substituted).
pub async fn start_recording_backend(status: u16, body: &'static str) -> (SocketAddr, Log) {
    start_backend(status, body, Duration::ZERO).await
}

/// Like `start_recording_backend`, but waits `delay` before answering.
pub async fn start_slow_backend(delay: Duration) -> (SocketAddr, Log) {
    start_backend(200, "late", delay).await
}

async fn start_backend(status: u16, body: &'static str, delay: Duration) -> (SocketAddr, Log) {
    let log: Log = Arc::default();
    let backend = Backend {
        log: log.clone(),
        status: StatusCode::from_u16(status).unwrap(),
        body,
        delay,
    };
    let app = Router::new().fallback(record).with_state(backend);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, log)
}

/// Poll `check` until it returns true or `timeout` elapses.
pub async fn eventually<F: FnMut() -> bool>(timeout: Duration, mut check: F) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    check()
}
