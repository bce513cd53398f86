//! Connection-scoped header stripping for both proxy directions.
//!
//! [`sanitize`] is a pure filter: it copies every header except the
//! ones owned by a single transport hop. Which names are dropped depends
//! on the [`Direction`]. Name matching is case-insensitive because
//! [`HeaderName`] is always normalized; values pass through untouched
//! and repeated headers keep their order.

use axum::http::header::{self, HeaderMap, HeaderName};

/// Dropped from the caller's request before it is sent to the backend.
/// `host` is re-derived by the client from the target URI.
static REQUEST_STRIPPED: [HeaderName; 3] = [
    header::HOST,
    header::CONNECTION,
    header::TRANSFER_ENCODING,
];

/// Dropped from the backend's response before it is relayed.
/// The body has already been collected and decoded, so framing and
/// encoding headers from the backend no longer describe it.
static RESPONSE_STRIPPED: [HeaderName; 4] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::TRANSFER_ENCODING,
    header::CONTENT_ENCODING,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    #[must_use]
    pub fn stripped(self) -> &'static [HeaderName] {
        match self {
            Self::Request => &REQUEST_STRIPPED,
            Self::Response => &RESPONSE_STRIPPED,
        }
    }
}

#[must_use]
pub fn sanitize(headers: &HeaderMap, direction: Direction) -> HeaderMap {
    let stripped = direction.stripped();
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !stripped.contains(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
