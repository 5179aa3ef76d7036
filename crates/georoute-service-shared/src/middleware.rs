//! Request correlation.
//!
//! The `X-Request-ID` header is honoured when present; otherwise a UUID v7
//! (time-sortable) is generated. [`request_span`] plugs into tower-http's
//! `TraceLayer` so every log line of a request carries the same id, and
//! handlers put the id into the `instance` of any problem document.

use axum::http::{HeaderMap, Request};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Correlation header name.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Fresh UUID v7 id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The `X-Request-ID` header value, or a generated id when it is missing,
/// empty, or not valid UTF-8.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Span for one HTTP request, for `TraceLayer::make_span_with`.
pub fn request_span<B>(request: &Request<B>) -> Span {
    let request_id = extract_or_generate_request_id(request.headers());
    info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn header_value_is_used_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Request-ID", HeaderValue::from_static("req-456"));
        assert_eq!(extract_or_generate_request_id(&headers).as_str(), "req-456");
    }

    #[test]
    fn missing_or_empty_header_generates() {
        assert_eq!(
            extract_or_generate_request_id(&HeaderMap::new()).as_str().len(),
            36
        );

        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(""));
        assert_eq!(extract_or_generate_request_id(&headers).as_str().len(), 36);
    }

    #[test]
    fn request_span_is_named() {
        let request = Request::builder()
            .uri("/api/v1/route?debug=1")
            .body(())
            .unwrap();
        let span = request_span(&request);
        // disabled without a subscriber, but the metadata is still attached
        if let Some(metadata) = span.metadata() {
            assert_eq!(metadata.name(), "request");
        }
    }
}
