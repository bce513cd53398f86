//! Core HTTP request forwarding handler.
//!
//! The [`forward_handler`] function is the Axum fallback that receives
//! every non-`/health` request, whatever its path or method, and relays it
//! to the backend. Submodules handle hop-by-hop header stripping
//! ([`headers`]), credential injection ([`auth`]), and the outbound
//! exchange ([`upstream`]).

pub mod auth;
pub mod headers;
pub mod upstream;

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::error::GatewayError;
use crate::server::AppState;

use self::headers::{sanitize, Direction};

pub async fn forward_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = req_headers
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let target = upstream::target_url(&state.config.backend_url, uri.path(), uri.query());

    tracing::info!(
        request_id = %request_id,
        method = %method,
        url = %target,
        "proxying request"
    );

    let start = Instant::now();
    let result = match upstream::build_request(
        &method,
        &target,
        &req_headers,
        &state.authorization,
        body,
    ) {
        Ok(request) => {
            upstream::send(&state.http_client, request, state.config.forward_timeout).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(backend) => {
            tracing::info!(
                request_id = %request_id,
                status = backend.status.as_u16(),
                latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "backend responded"
            );
            relay(backend)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                url = %target,
                error = %e,
                "error proxying request"
            );
            bad_gateway(&e)
        }
    }
}

fn relay(backend: upstream::BackendResponse) -> Response {
    let mut response = Response::new(axum::body::Body::from(backend.body));
    *response.status_mut() = backend.status;
    *response.headers_mut() = sanitize(&backend.headers, Direction::Response);
    response
}

fn bad_gateway(error: &GatewayError) -> Response {
    (StatusCode::BAD_GATEWAY, format!("Proxy error: {error}")).into_response()
}
