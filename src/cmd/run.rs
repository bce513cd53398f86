//! `searchgate run` — start the gateway.
//!
//! Builds the immutable [`GatewayConfig`] from flags and environment,
//! constructs the shared [`AppState`], and serves the Axum router until
//! Ctrl+C / SIGTERM.

use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), GatewayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let config = GatewayConfig::from_args(&args)?;
    let addr = config.listen;

    if !config.verify_tls {
        tracing::warn!(
            backend = %config.backend_url,
            "backend TLS certificate verification is disabled; pass --verify-tls in production"
        );
    }

    tracing::info!(
        addr = %addr,
        backend = %config.backend_url,
        timeout_ms = u64::try_from(config.forward_timeout.as_millis()).unwrap_or(u64::MAX),
        health_path = %config.health_path,
        "searchgate starting"
    );

    let state = Arc::new(AppState::new(config)?);
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "searchgate listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("searchgate stopped");
    Ok(())
}
