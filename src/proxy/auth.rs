//! Backend credential injection.
//!
//! The gateway holds one fixed username/password pair and attaches it as
//! HTTP Basic auth (RFC 7617) to every outbound request. The header value
//! is built once at startup and flagged sensitive so it never shows up in
//! `Debug` output or traces.

use axum::http::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::error::GatewayError;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build the `Authorization: Basic ...` value for this pair.
    pub fn basic_header(&self) -> Result<HeaderValue, GatewayError> {
        let token = base64_encode(format!("{}:{}", self.username, self.password).as_bytes());
        let mut value = HeaderValue::from_str(&format!("Basic {token}"))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Attach the backend credential, replacing any `Authorization` the caller sent.
pub fn inject(headers: &mut HeaderMap, authorization: &HeaderValue) {
    headers.insert(AUTHORIZATION, authorization.clone());
}

/// Standard padded base64, enough for a Basic credential.
fn base64_encode(input: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);
        let triple = (u32::from(chunk[0]) << 16) | (u32::from(b1) << 8) | u32::from(b2);

        for i in 0..4 {
            if i <= chunk.len() {
                let idx = (triple >> (18 - 6 * i)) & 0x3f;
                out.push(char::from(TABLE[idx as usize]));
            } else {
                out.push('=');
            }
        }
    }
    out
}
