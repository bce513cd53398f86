//! `searchgate health` — check the health of a running gateway.
//!
//! Sends a `GET /health` request to the specified URL and displays
//! the response as formatted text or raw JSON. An unhealthy gateway
//! still answers with a JSON body, so the body is shown before the
//! command fails.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::HealthArgs;
use crate::error::GatewayError;
use crate::health::HealthResponse;

pub async fn execute(args: HealthArgs) -> Result<(), GatewayError> {
    let url = format!("{}/health", args.url.trim_end_matches('/'));
    let uri: hyper::Uri =
        url.parse().map_err(
            |e: hyper::http::uri::InvalidUri| GatewayError::UriParse {
                source: Box::new(e),
            },
        )?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| GatewayError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| GatewayError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
    } else {
        match serde_json::from_slice::<HealthResponse>(&body) {
            Ok(health) => println!("{}", describe(&args.url, &health)),
            Err(e) => {
                eprintln!("Failed to parse health response: {e}");
                println!("{}", String::from_utf8_lossy(&body));
            }
        }
    }

    if !status.is_success() {
        return Err(GatewayError::HealthCheckFailed(status));
    }
    Ok(())
}

fn describe(url: &str, health: &HealthResponse) -> String {
    if health.is_healthy() {
        format!(
            "\u{2713} searchgate is healthy ({url})\n  backend: {}",
            health.backend.as_deref().unwrap_or("connected")
        )
    } else {
        let detail = health
            .error
            .as_deref()
            .or(health.backend.as_deref())
            .unwrap_or("unknown");
        format!("\u{2717} searchgate is unhealthy ({url})\n  backend: {detail}")
    }
}
