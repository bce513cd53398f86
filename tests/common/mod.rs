//! Shared harness: an in-process mock search backend that records every
//! request it receives, and a gateway instance pointed at it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tokio::sync::Mutex;

use searchgate::config::GatewayConfig;
use searchgate::proxy::auth::Credentials;
use searchgate::server::{self, AppState};

/// `Basic base64("admin:s3cret")`
pub const INJECTED_AUTH: &str = "Basic YWRtaW46czNjcmV0";

/// Plain text served gzip-compressed at `/gzipped`.
pub const GZIPPED_TEXT: &str = "hello from the search cluster\n";

const GZIPPED_BODY: [u8; 50] = [
    31, 139, 8, 0, 0, 0, 0, 0, 2, 3, 203, 72, 205, 201, 201, 87, 72, 43, 202, 207, 85, 40, 201,
    72, 85, 40, 78, 77, 44, 74, 206, 80, 72, 206, 41, 45, 46, 73, 45, 226, 2, 0, 105, 115, 156,
    222, 30, 0, 0, 0,
];

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Captured>>>,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn requests(&self) -> Vec<Captured> {
        self.requests.lock().await.clone()
    }

    pub async fn only_request(&self) -> Captured {
        let requests = self.requests().await;
        assert_eq!(requests.len(), 1, "expected exactly one backend request");
        requests.into_iter().next().unwrap()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

struct BackendState {
    requests: Arc<Mutex<Vec<Captured>>>,
    health_status: StatusCode,
}

async fn backend_handler(
    State(state): State<Arc<BackendState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.lock().await.push(Captured {
        method,
        uri: uri.clone(),
        headers,
        body,
    });

    match uri.path() {
        "/_cluster/health" => (
            state.health_status,
            Json(serde_json::json!({"cluster_name": "test", "status": "green"})),
        )
            .into_response(),
        "/redirect" => (StatusCode::FOUND, [("location", "/elsewhere")]).into_response(),
        "/missing-index/_search" => (
            StatusCode::NOT_FOUND,
            [("x-backend", "mock")],
            Json(serde_json::json!({"error": {"type": "index_not_found_exception"}, "status": 404})),
        )
            .into_response(),
        "/gzipped" => (
            StatusCode::OK,
            [("content-encoding", "gzip"), ("content-type", "text/plain")],
            Bytes::from_static(&GZIPPED_BODY),
        )
            .into_response(),
        "/slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            "too late".into_response()
        }
        _ => (
            StatusCode::OK,
            [("x-backend", "mock")],
            Json(serde_json::json!({"hits": {"total": {"value": 0}}})),
        )
            .into_response(),
    }
}

pub async fn start_backend(health_status: StatusCode) -> MockBackend {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(BackendState {
        requests: Arc::clone(&requests),
        health_status,
    });
    let router = Router::new().fallback(backend_handler).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    MockBackend {
        addr,
        requests,
        shutdown: Some(shutdown_tx),
    }
}

/// An address nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn test_config(backend_url: &str) -> GatewayConfig {
    GatewayConfig::with_backend(
        url::Url::parse(backend_url).unwrap(),
        Credentials::new("admin", "s3cret"),
    )
}

pub async fn start_gateway(
    config: GatewayConfig,
) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let state = Arc::new(AppState::new(config).unwrap());
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
