//! Logging middleware
//!
//! Logs every HTTP request with its method, path, status and latency.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Request logging layer, installed with `axum::middleware::from_fn`
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("http_request", %request_id, %method, %path);

    let start = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    let _entered = span.enter();
    if status.is_server_error() {
        warn!(status = status.as_u16(), latency_ms = latency_ms, "Request failed");
    } else {
        info!(status = status.as_u16(), latency_ms = latency_ms, "Request completed");
    }

    response
}
