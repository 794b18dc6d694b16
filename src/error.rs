//! Error types for the todo API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::response::error_envelope;

/// Every user-visible failure, each mapping to a status code and a message
/// rendered inside the JSON envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("title is required")]
    TitleRequired,

    #[error("title must be 255 characters or fewer")]
    TitleTooLong,

    #[error("invalid todo id")]
    InvalidId,

    #[error("request body is not valid JSON")]
    InvalidBody,

    #[error("request body too large")]
    BodyTooLarge,

    #[error("failed to read request body")]
    BodyRead,

    #[error("too many requests, retry later")]
    TooManyRequests,

    #[error("no matching route")]
    RouteNotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("todo not found")]
    NotFound,

    #[error("no matching todo to update")]
    UpdateMissing,

    #[error("no matching todo to delete")]
    DeleteMissing,

    #[error("failed to fetch todos")]
    FetchFailed,

    #[error("failed to add todo")]
    InsertFailed,

    #[error("failed to update todo")]
    UpdateFailed,

    #[error("failed to delete todo")]
    DeleteFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TitleRequired | Self::TitleTooLong | Self::InvalidId | Self::InvalidBody => {
                StatusCode::BAD_REQUEST
            }
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::RouteNotFound | Self::NotFound | Self::UpdateMissing | Self::DeleteMissing => {
                StatusCode::NOT_FOUND
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BodyRead
            | Self::FetchFailed
            | Self::InsertFailed
            | Self::UpdateFailed
            | Self::DeleteFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_envelope(self.status(), &self.to_string())
    }
}
