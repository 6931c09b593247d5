//! W3C Trace Context propagation for service-to-service calls.
//!
//! See: https://www.w3.org/TR/trace-context/

use crate::utils::signature::{EVENT_SIGNATURE_HEADER, EVENT_TIMESTAMP_HEADER, generate_signature};
use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Header name for W3C traceparent
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Header name for W3C tracestate
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Header name for request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Inject current trace context into HTTP request headers.
///
/// Does nothing when there is no sampled OpenTelemetry span, e.g. when the
/// OTLP exporter is disabled.
fn inject_trace_context(headers: &mut HeaderMap) {
    let span = Span::current();
    let context = span.context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );

    if let Ok(value) = traceparent.parse() {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty() {
        if let Ok(value) = tracestate.parse() {
            headers.insert(TRACESTATE_HEADER, value);
        }
    }
}

/// Inject trace context and optional request ID into headers.
pub fn inject_trace_headers(headers: &mut HeaderMap, request_id: Option<&str>) {
    inject_trace_context(headers);

    if let Some(value) = request_id.and_then(|id| id.parse().ok()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

/// Extract request ID from incoming request headers.
pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Outbound request that carries the caller's trace context and request id.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self { request }
    }

    /// Forward the caller's session cookie. Empty values are skipped so
    /// anonymous calls stay anonymous downstream.
    pub fn cookie(self, cookie: &str) -> Self {
        if cookie.is_empty() {
            return self;
        }
        Self {
            request: self.request.header(reqwest::header::COOKIE, cookie),
        }
    }

    /// Attach a JSON event body with its delivery timestamp and HMAC
    /// signature. The body is sent byte-for-byte as signed.
    pub fn signed_json(self, secret: &str, timestamp: i64, body: Vec<u8>) -> anyhow::Result<Self> {
        let signature = generate_signature(secret, timestamp, &body)?;
        Ok(Self {
            request: self
                .request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .header(EVENT_TIMESTAMP_HEADER, timestamp.to_string())
                .header(EVENT_SIGNATURE_HEADER, signature)
                .body(body),
        })
    }

    pub async fn send_with_request_id(
        self,
        request_id: Option<&str>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, request_id);

        self.request.headers(headers).send().await
    }

    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        self.send_with_request_id(None).await
    }
}

/// Extension trait for reqwest::Client to create traced requests.
pub trait TracedClientExt {
    fn traced_get(&self, url: &str) -> TracedRequest;
    fn traced_post(&self, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced_get(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.get(url))
    }

    fn traced_post(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inject_without_span_adds_nothing() {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        // Without an active span, headers should be empty
        assert!(headers.is_empty());
    }

    #[test]
    fn signed_json_sets_verifiable_headers() {
        let body = br#"{"subject":"payment:created"}"#.to_vec();
        let request = reqwest::Client::new()
            .traced_post("http://localhost/events")
            .signed_json("events_secret", 1678886400, body.clone())
            .unwrap()
            .request
            .build()
            .unwrap();

        let headers = request.headers();
        assert_eq!(headers[EVENT_TIMESTAMP_HEADER], "1678886400");
        let signature = headers[EVENT_SIGNATURE_HEADER].to_str().unwrap();
        assert!(
            crate::utils::signature::verify_signature("events_secret", 1678886400, &body, signature)
                .unwrap()
        );
    }

    #[test]
    fn empty_cookie_is_not_forwarded() {
        let request = reqwest::Client::new()
            .traced_get("http://localhost/api/orders")
            .cookie("")
            .request
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::COOKIE).is_none());

        let request = reqwest::Client::new()
            .traced_get("http://localhost/api/orders")
            .cookie("session=abc")
            .request
            .build()
            .unwrap();
        assert_eq!(request.headers()[reqwest::header::COOKIE], "session=abc");
    }

    #[test]
    fn request_id_round_trips() {
        let mut headers = HeaderMap::new();
        inject_trace_headers(&mut headers, Some("abc-123"));

        assert_eq!(extract_request_id(&headers), Some("abc-123".to_string()));
        assert!(headers.get(TRACEPARENT_HEADER).is_none());
    }
}
