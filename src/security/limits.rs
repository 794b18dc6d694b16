//! Request body size cap.
//!
//! POST and PUT bodies are buffered up to the configured cap before they
//! reach the handlers; anything larger is rejected with 413 in the JSON
//! envelope. Other methods pass through untouched.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Middleware enforcing the body size cap on mutating requests.
pub async fn limit_request_body(
    State(max_bytes): State<usize>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() != Method::POST && request.method() != Method::PUT {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, max_bytes).await {
        Ok(bytes) => bytes,
        Err(err) if is_length_limit(&err) => {
            tracing::warn!(max_bytes, "request body over size cap");
            return ApiError::BodyTooLarge.into_response();
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to read request body");
            return ApiError::BodyRead.into_response();
        }
    };

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(err) = source {
        if err.is::<http_body_util::LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}
