//! searchgate is an authenticating reverse proxy for a search-cluster
//! backend.
//!
//! Every request, whatever its path or method, is forwarded to the
//! configured backend with connection-scoped headers removed and a fixed
//! Basic-auth credential attached. The backend's status and body come back
//! to the caller unchanged. `GET /health` is answered by a dedicated check
//! of the backend's health path rather than forwarded.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`config`] -- Immutable [`GatewayConfig`](config::GatewayConfig) built
//!   and validated once at startup.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` backend check.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Core forwarding: header sanitizing, credential injection,
//!   and the outbound exchange.
//! - [`server`] -- Axum server setup, shared gateway context, HTTP client, and
//!   graceful shutdown.
//! - [`tls`] -- Backend TLS settings, including the insecure default verifier.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
pub mod tls;
