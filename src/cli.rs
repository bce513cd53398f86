//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health), and their associated argument structs.
//! Every `run` flag has an environment variable equivalent for container
//! deployments.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{
    DEFAULT_BACKEND_URL, DEFAULT_FORWARD_TIMEOUT_MS, DEFAULT_HEALTH_PATH,
    DEFAULT_HEALTH_TIMEOUT_MS, DEFAULT_MAX_BODY,
};

#[derive(Parser)]
#[command(
    name = "searchgate",
    version,
    about = "Authenticating reverse proxy for search-cluster backends",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        searchgate run                                        Proxy to https://localhost:9200\n  \
        searchgate run --backend-url https://search:9200      Specific backend\n  \
        searchgate health                                     Probe a running gateway"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway
    Run(Box<RunArgs>),

    /// Check health of a running gateway
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        searchgate run --pretty                                 Local dev mode\n  \
        searchgate run --backend-url https://search:9200 --verify-tls\n  \
        OPENSEARCH_PASSWORD=... searchgate run                  Credentials from env")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "SEARCHGATE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "SEARCHGATE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Backend --
    /// Backend base URL; request paths are appended to it
    #[arg(
        long,
        env = "OPENSEARCH_ENDPOINT",
        default_value = DEFAULT_BACKEND_URL,
        help_heading = "Backend"
    )]
    pub backend_url: String,

    /// Username injected as Basic auth on every forwarded request
    #[arg(
        long,
        env = "OPENSEARCH_USERNAME",
        default_value = "admin",
        help_heading = "Backend"
    )]
    pub username: String,

    /// Password injected as Basic auth on every forwarded request
    #[arg(
        long,
        env = "OPENSEARCH_PASSWORD",
        default_value = "admin",
        hide_env_values = true,
        hide_default_value = true,
        help_heading = "Backend"
    )]
    pub password: String,

    /// Verify the backend's TLS certificate. OFF BY DEFAULT, WHICH IS INSECURE:
    /// any certificate is accepted. Enable this in production.
    #[arg(long, env = "BACKEND_VERIFY_TLS", help_heading = "Backend")]
    pub verify_tls: bool,

    /// Backend path queried by GET /health
    #[arg(
        long,
        env = "BACKEND_HEALTH_PATH",
        default_value = DEFAULT_HEALTH_PATH,
        help_heading = "Backend"
    )]
    pub health_path: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Forwarded request timeout in milliseconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = DEFAULT_FORWARD_TIMEOUT_MS,
        help_heading = "Tuning"
    )]
    pub timeout: u64,

    /// Backend health check timeout in milliseconds (must be below --timeout)
    #[arg(
        long,
        env = "HEALTH_TIMEOUT_MS",
        default_value_t = DEFAULT_HEALTH_TIMEOUT_MS,
        help_heading = "Tuning"
    )]
    pub health_timeout: u64,

    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = DEFAULT_MAX_BODY,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running gateway
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}
