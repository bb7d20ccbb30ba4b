//! Logging middleware
//!
//! Records HTTP request and response information

use axum::{
    extract::Request,
    http::{HeaderMap, Method, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Request logging middleware
///
/// Wraps each HTTP request in a span carrying a fresh request id
pub async fn request_logging_middleware(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
    );

    async move {
        info!(
            "Request started: {} {} - User-Agent: {}",
            method,
            uri,
            headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown")
        );

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        let status = response.status();

        if status.is_server_error() {
            warn!(
                "Server error: {} - Duration: {:.2}ms",
                status,
                duration.as_secs_f64() * 1000.0
            );
        } else {
            info!(
                "Request completed: {} - Duration: {:.2}ms",
                status,
                duration.as_secs_f64() * 1000.0
            );
        }

        response
    }
    .instrument(span)
    .await
}
