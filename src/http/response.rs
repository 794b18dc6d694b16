//! JSON response envelope.
//!
//! Every response, success or failure, carries the same shape:
//! `{"data": ..., "status": {"code", "error", "error_message"}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::Value;

/// Status metadata attached to every response.
#[derive(Debug, Serialize)]
pub struct StatusInfo {
    pub code: u16,
    pub error: bool,
    pub error_message: String,
}

/// The response envelope wrapping the payload.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub status: StatusInfo,
}

/// Wrap a successful payload in the envelope.
pub fn ok_envelope<T: Serialize>(code: StatusCode, data: T) -> Response {
    let envelope = Envelope {
        data,
        status: StatusInfo {
            code: code.as_u16(),
            error: false,
            error_message: String::new(),
        },
    };
    (code, Json(envelope)).into_response()
}

/// Wrap an error message in the envelope with a null payload.
pub fn error_envelope(code: StatusCode, message: &str) -> Response {
    let envelope = Envelope {
        data: Value::Null,
        status: StatusInfo {
            code: code.as_u16(),
            error: true,
            error_message: message.to_string(),
        },
    };
    (code, Json(envelope)).into_response()
}
