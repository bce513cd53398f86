//! Gateway configuration, read once at startup.
//!
//! [`GatewayConfig`] is the immutable, typed form of the command-line
//! flags and environment variables. It is built by
//! [`GatewayConfig::from_args`], which runs every check in
//! [`validation`] and reports all problems at once.

pub mod validation;

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::cli::RunArgs;
use crate::error::{GatewayError, ValidationError};
use crate::proxy::auth::Credentials;

pub const DEFAULT_BACKEND_URL: &str = "https://localhost:9200";
pub const DEFAULT_HEALTH_PATH: &str = "/_cluster/health";
pub const DEFAULT_FORWARD_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_HEALTH_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_MAX_BODY: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen: SocketAddr,
    pub backend_url: Url,
    pub credentials: Credentials,
    /// Off by default. See [`crate::tls`].
    pub verify_tls: bool,
    pub forward_timeout: Duration,
    pub health_timeout: Duration,
    pub health_path: String,
    pub max_body: usize,
}

impl GatewayConfig {
    /// Config with every tunable at its default, pointed at `backend_url`.
    #[must_use]
    pub fn with_backend(backend_url: Url, credentials: Credentials) -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            backend_url,
            credentials,
            verify_tls: false,
            forward_timeout: Duration::from_millis(DEFAULT_FORWARD_TIMEOUT_MS),
            health_timeout: Duration::from_millis(DEFAULT_HEALTH_TIMEOUT_MS),
            health_path: DEFAULT_HEALTH_PATH.into(),
            max_body: DEFAULT_MAX_BODY,
        }
    }

    pub fn from_args(args: &RunArgs) -> Result<Self, GatewayError> {
        let mut errors = Vec::new();

        let listen = match format!("{}:{}", args.host, args.port).parse::<SocketAddr>() {
            Ok(addr) => Some(addr),
            Err(e) => {
                errors.push(ValidationError {
                    field: "host".into(),
                    message: format!("'{}:{}' is not a valid listen address ({e})", args.host, args.port),
                    suggestion: Some("use an IP literal such as 0.0.0.0 or 127.0.0.1".into()),
                });
                None
            }
        };

        let backend_url = match validation::parse_backend_url(&args.backend_url) {
            Ok(url) => Some(url),
            Err(message) => {
                errors.push(ValidationError {
                    field: "backend_url".into(),
                    message,
                    suggestion: Some(format!("e.g. {DEFAULT_BACKEND_URL}")),
                });
                None
            }
        };

        if let Err(message) = validation::validate_username(&args.username) {
            errors.push(ValidationError {
                field: "username".into(),
                message,
                suggestion: None,
            });
        }

        if let Err(message) = validation::validate_health_path(&args.health_path) {
            errors.push(ValidationError {
                field: "health_path".into(),
                message,
                suggestion: Some(format!("did you mean '/{}'?", args.health_path)),
            });
        }

        errors.extend(validation::validate_timeouts(args.timeout, args.health_timeout));

        if args.max_body == 0 {
            errors.push(ValidationError {
                field: "max_body".into(),
                message: "must be greater than zero".into(),
                suggestion: None,
            });
        }

        match (listen, backend_url) {
            (Some(listen), Some(backend_url)) if errors.is_empty() => Ok(Self {
                listen,
                backend_url,
                credentials: Credentials::new(&args.username, &args.password),
                verify_tls: args.verify_tls,
                forward_timeout: Duration::from_millis(args.timeout),
                health_timeout: Duration::from_millis(args.health_timeout),
                health_path: args.health_path.clone(),
                max_body: args.max_body,
            }),
            _ => Err(GatewayError::InvalidConfig { errors }),
        }
    }
}
