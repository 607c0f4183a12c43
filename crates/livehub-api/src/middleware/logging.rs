//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

use crate::extractors::client::client_identity;

/// Logs request method, path, client, status, and duration.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_identity(request.headers(), request.extensions());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    if response.status().is_server_error() {
        warn!(method = %method, path = %path, client = %client, status, duration_ms, "HTTP request failed");
    } else {
        info!(method = %method, path = %path, client = %client, status, duration_ms, "HTTP request");
    }

    response
}
