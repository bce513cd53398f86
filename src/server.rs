//! Axum server setup, shared gateway context, and graceful shutdown.
//!
//! Contains [`AppState`] (the `Arc`-shared context holding the immutable
//! config, the precomputed backend credential, and the HTTP client),
//! [`build_router`] for constructing the Axum router with middleware
//! layers, [`build_http_client`] for the connection-pooled hyper client,
//! and [`shutdown_signal`] for SIGTERM / Ctrl+C handling.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tower::ServiceBuilder;
use tower_http::decompression::{Decompression, DecompressionLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::health::{health_handler, health_method_not_allowed};
use crate::proxy;
use crate::tls;

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient =
    Decompression<Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>>;

pub struct AppState {
    pub config: GatewayConfig,
    pub authorization: HeaderValue,
    pub http_client: HttpClient,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let authorization = config.credentials.basic_header()?;
        let http_client = build_http_client(config.verify_tls);
        Ok(Self {
            config,
            authorization,
            http_client,
        })
    }
}

#[must_use]
pub fn build_http_client(verify_tls: bool) -> HttpClient {
    // When multiple rustls crypto providers are compiled in, rustls cannot
    // auto-detect which one to use. Explicitly install `ring` as the default.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let builder = hyper_rustls::HttpsConnectorBuilder::new();
    let https = if verify_tls {
        builder
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .build()
    } else {
        builder
            .with_tls_config(tls::insecure_client_config())
            .https_or_http()
            .enable_http1()
            .build()
    };

    let client = Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https);

    ServiceBuilder::new()
        .layer(DecompressionLayer::new())
        .service(client)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body = state.config.max_body;
    Router::new()
        .route(
            "/health",
            get(health_handler).fallback(health_method_not_allowed),
        )
        .fallback(proxy::forward_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
