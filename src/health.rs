//! `GET /health` endpoint handler.
//!
//! Probes the backend's own health path with the injected credential and
//! the short health timeout, independently of the forwarding path.
//! Returns `200 {"status":"healthy","backend":"connected"}` when the
//! backend answers 200, and `503` with an `unhealthy` [`HealthResponse`]
//! otherwise.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::proxy::upstream;
use crate::server::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug)]
pub enum HealthResult {
    Healthy,
    /// The backend answered, but not with 200.
    Unreachable,
    /// The check itself failed (connect error, timeout).
    Failed(GatewayError),
}

impl HealthResult {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Healthy => StatusCode::OK,
            Self::Unreachable | Self::Failed(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    #[must_use]
    pub fn to_response(&self) -> HealthResponse {
        match self {
            Self::Healthy => HealthResponse {
                status: "healthy".into(),
                backend: Some("connected".into()),
                error: None,
            },
            Self::Unreachable => HealthResponse {
                status: "unhealthy".into(),
                backend: Some("unreachable".into()),
                error: None,
            },
            Self::Failed(e) => HealthResponse {
                status: "unhealthy".into(),
                backend: None,
                error: Some(e.to_string()),
            },
        }
    }
}

impl IntoResponse for HealthResult {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

pub async fn check_backend(state: &AppState) -> HealthResult {
    let config = &state.config;
    let target = upstream::target_url(&config.backend_url, &config.health_path, None);

    let request = match upstream::build_request(
        &Method::GET,
        &target,
        &HeaderMap::new(),
        &state.authorization,
        Bytes::new(),
    ) {
        Ok(r) => r,
        Err(e) => return HealthResult::Failed(e),
    };

    match upstream::send(&state.http_client, request, config.health_timeout).await {
        Ok(response) if response.status == StatusCode::OK => HealthResult::Healthy,
        Ok(response) => {
            tracing::warn!(
                url = %target,
                status = response.status.as_u16(),
                "backend health check returned non-200"
            );
            HealthResult::Unreachable
        }
        Err(e) => {
            tracing::error!(url = %target, error = %e, "backend health check failed");
            HealthResult::Failed(e)
        }
    }
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> HealthResult {
    check_backend(&state).await
}

/// `/health` is reserved; other methods are refused rather than forwarded.
pub async fn health_method_not_allowed() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET, HEAD")])
}
