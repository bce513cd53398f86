//! Startup configuration checks.
//!
//! Each `validate_*` / `parse_*` function returns a human-readable
//! message on failure; [`GatewayConfig::from_args`](super::GatewayConfig::from_args)
//! turns them into [`ValidationError`] values with field names.

use url::Url;

use crate::error::ValidationError;

/// Parse the backend base URL. Returns the URL or a human-readable error.
pub fn parse_backend_url(raw: &str) -> Result<Url, String> {
    let parsed = Url::parse(raw).map_err(|e| format!("'{raw}' is not a valid URL ({e})"))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    if parsed.host_str().is_none() {
        return Err(format!("'{raw}' has no host"));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err("backend URL must not carry a query string or fragment".into());
    }
    Ok(parsed)
}

/// Basic auth cannot represent a user-id containing a colon (RFC 7617).
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.contains(':') {
        return Err("must not contain ':'".into());
    }
    Ok(())
}

pub fn validate_health_path(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err(format!("'{path}' must start with '/'"));
    }
    Ok(())
}

/// Both timeouts must be non-zero and the health check must give up before a
/// forwarded request would.
#[must_use]
pub fn validate_timeouts(forward_ms: u64, health_ms: u64) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if forward_ms == 0 {
        errors.push(ValidationError {
            field: "timeout".into(),
            message: "must be greater than zero".into(),
            suggestion: None,
        });
    }

    if health_ms == 0 {
        errors.push(ValidationError {
            field: "health_timeout".into(),
            message: "must be greater than zero".into(),
            suggestion: None,
        });
    } else if health_ms >= forward_ms {
        errors.push(ValidationError {
            field: "health_timeout".into(),
            message: format!(
                "{health_ms}ms must be shorter than the forwarding timeout ({forward_ms}ms)"
            ),
            suggestion: Some("lower --health-timeout or raise --timeout".into()),
        });
    }

    errors
}
