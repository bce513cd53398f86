//! Outbound side of the forwarder: target resolution, request
//! construction, and the timed exchange with the backend.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, Uri};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use tower::ServiceExt;
use url::Url;

use super::auth;
use super::headers::{sanitize, Direction};
use crate::error::GatewayError;
use crate::server::HttpClient;

#[derive(Debug)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Append `path` (and the raw `query`, if any) to the backend base URL.
///
/// The base keeps its own path prefix; a trailing slash on the base and a
/// leading slash on `path` collapse into one. The query is copied verbatim,
/// already-escaped sequences are not touched.
#[must_use]
pub fn target_url(base: &Url, path: &str, query: Option<&str>) -> String {
    let base = base.as_str().trim_end_matches('/');
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut target = format!("{base}/{path}");
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    target
}

pub fn build_request(
    method: &Method,
    target: &str,
    headers: &HeaderMap,
    authorization: &HeaderValue,
    body: Bytes,
) -> Result<Request<Full<Bytes>>, GatewayError> {
    let uri: Uri = target
        .parse()
        .map_err(|e: axum::http::uri::InvalidUri| GatewayError::UriParse {
            source: Box::new(e),
        })?;

    let mut outbound = sanitize(headers, Direction::Request);
    auth::inject(&mut outbound, authorization);

    let mut request = Request::new(Full::new(body));
    *request.method_mut() = method.clone();
    *request.uri_mut() = uri;
    *request.headers_mut() = outbound;
    Ok(request)
}

/// Send one request and collect the whole response within `timeout`.
///
/// The deadline covers connect, response head, and body. Redirects are
/// returned as-is and nothing is retried.
pub async fn send(
    client: &HttpClient,
    request: Request<Full<Bytes>>,
    timeout: Duration,
) -> Result<BackendResponse, GatewayError> {
    let exchange = async {
        let response = client
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| GatewayError::Upstream {
                source: Box::new(e),
            })?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| GatewayError::Upstream { source: e })?
            .to_bytes();

        Ok::<_, GatewayError>(BackendResponse {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| GatewayError::UpstreamTimeout(timeout))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::auth::Credentials;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn joins_path_and_query() {
        assert_eq!(
            target_url(
                &base("https://localhost:9200"),
                "/my-index/_search",
                Some("size=10")
            ),
            "https://localhost:9200/my-index/_search?size=10"
        );
    }

    #[test]
    fn root_path_maps_to_base_root() {
        assert_eq!(
            target_url(&base("http://search:9200"), "/", None),
            "http://search:9200/"
        );
        assert_eq!(
            target_url(&base("http://search:9200"), "", None),
            "http://search:9200/"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        assert_eq!(
            target_url(&base("http://search:9200/cluster-a"), "/_bulk", None),
            "http://search:9200/cluster-a/_bulk"
        );
        assert_eq!(
            target_url(&base("http://search:9200/cluster-a/"), "/_bulk", None),
            "http://search:9200/cluster-a/_bulk"
        );
    }

    #[test]
    fn query_is_not_reescaped() {
        assert_eq!(
            target_url(
                &base("http://search:9200"),
                "/logs-*/_search",
                Some("q=level:error%20AND%20svc:api&pretty")
            ),
            "http://search:9200/logs-*/_search?q=level:error%20AND%20svc:api&pretty"
        );
    }

    #[test]
    fn empty_query_adds_no_question_mark() {
        assert_eq!(
            target_url(&base("http://search:9200"), "/_cat/indices", Some("")),
            "http://search:9200/_cat/indices"
        );
    }

    #[test]
    fn build_request_sanitizes_and_injects() {
        let mut inbound = HeaderMap::new();
        inbound.insert("host", HeaderValue::from_static("gateway:8080"));
        inbound.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        inbound.insert("content-type", HeaderValue::from_static("application/x-ndjson"));
        inbound.insert("authorization", HeaderValue::from_static("Bearer caller"));

        let authorization = Credentials::new("admin", "admin").basic_header().unwrap();
        let body = Bytes::from_static(b"{\"index\":{}}\n{\"msg\":\"hi\"}\n");
        let request = build_request(
            &Method::POST,
            "http://search:9200/_bulk",
            &inbound,
            &authorization,
            body.clone(),
        )
        .unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.uri(), "http://search:9200/_bulk");
        assert!(request.headers().get("host").is_none());
        assert!(request.headers().get("transfer-encoding").is_none());
        assert_eq!(
            request.headers().get("content-type").unwrap(),
            "application/x-ndjson"
        );
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Basic YWRtaW46YWRtaW4="
        );
    }

    #[test]
    fn build_request_rejects_unparseable_target() {
        let authorization = Credentials::new("admin", "admin").basic_header().unwrap();
        let result = build_request(
            &Method::GET,
            "http://search:9200/bad path",
            &HeaderMap::new(),
            &authorization,
            Bytes::new(),
        );
        assert!(matches!(result, Err(GatewayError::UriParse { .. })));
    }
}
