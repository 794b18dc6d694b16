//! Request ID handling.
//!
//! A UUID v4 is attached to every request as early as possible so log lines
//! from middleware and handlers correlate; the ID is echoed back to the
//! client in the response headers. A client-supplied ID is preserved.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Middleware attaching the request ID to request and response.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let id = match request.headers().get(X_REQUEST_ID) {
        Some(existing) => existing.clone(),
        None => {
            let generated = Uuid::new_v4().to_string();
            // UUIDs are always valid header values.
            HeaderValue::from_str(&generated)
                .unwrap_or_else(|_| HeaderValue::from_static("invalid"))
        }
    };

    request.headers_mut().insert(X_REQUEST_ID, id.clone());

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_REQUEST_ID, id);
    response
}
