//! Request tracing middleware.
//!
//! Provides request ID extraction and generation for log correlation.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Request ID stored in request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Middleware that extracts or generates a request ID.
///
/// If the `X-Request-ID` header is present, uses that value. Otherwise,
/// generates a new UUID v4. The ID is stored in request extensions, echoed
/// in the response headers, and attached to the request span.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    // Entering a span guard across an await point detaches it from the task,
    // so the whole request future is instrumented instead.
    async move {
        let start = std::time::Instant::now();

        let mut response = next.run(req).await;

        let duration_ms = start.elapsed().as_millis();
        let status = response.status().as_u16();

        tracing::info!(
            request_id = %request_id,
            status = status,
            duration_ms = duration_ms,
            "Request completed"
        );

        if let Ok(header_value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static("x-request-id"), header_value);
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_struct() {
        let id = RequestId("test-id-123".to_string());
        assert_eq!(id.0, "test-id-123");
    }

    #[test]
    fn test_request_id_struct_clone() {
        let id = RequestId("test-id".to_string());
        let cloned = id.clone();
        assert_eq!(cloned.0, "test-id");
    }

    #[test]
    fn test_request_id_header_constant() {
        assert_eq!(REQUEST_ID_HEADER, "X-Request-ID");
    }

    fn traced_router() -> axum::Router {
        axum::Router::new()
            .route("/ping", axum::routing::get(|| async { "pong" }))
            .layer(axum::middleware::from_fn(trace_id))
    }

    #[tokio::test]
    async fn test_incoming_request_id_echoed() {
        use tower::ServiceExt;

        let request = Request::builder()
            .uri("/ping")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = traced_router().oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_request_id_generated_when_absent() {
        use tower::ServiceExt;

        let request = Request::builder().uri("/ping").body(Body::empty()).unwrap();
        let response = traced_router().oneshot(request).await.unwrap();

        let generated = response.headers()["x-request-id"].to_str().unwrap();
        assert!(Uuid::parse_str(generated).is_ok());
    }
}
