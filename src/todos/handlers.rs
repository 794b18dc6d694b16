//! CRUD handlers for the todos resource.
//!
//! Bodies arrive pre-buffered by the body cap middleware; handlers decode
//! them with serde and answer in the JSON envelope. Database failures are
//! logged with the underlying error and surface as operation-specific 500s.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::http::response::ok_envelope;
use crate::http::server::AppState;
use crate::todos::store;
use crate::todos::types::{Todo, TodoInput};
use crate::todos::validation::validate_input;

/// GET /todos
pub async fn list_todos(State(state): State<AppState>) -> Response {
    match store::list(&state.pool).await {
        Ok(todos) => ok_envelope(StatusCode::OK, todos),
        Err(err) => {
            tracing::error!(error = %err, "failed to list todos");
            ApiError::FetchFailed.into_response()
        }
    }
}

/// POST /todos
pub async fn create_todo(State(state): State<AppState>, body: Bytes) -> Response {
    let input = match decode_body(&body) {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };

    match store::insert(&state.pool, &input).await {
        Ok(id) => {
            tracing::debug!(id, "todo created");
            ok_envelope(StatusCode::CREATED, Vec::<Todo>::new())
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to insert todo");
            ApiError::InsertFailed.into_response()
        }
    }
}

/// GET /todos/{id}
pub async fn get_todo(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match store::fetch(&state.pool, id).await {
        Ok(Some(todo)) => ok_envelope(StatusCode::OK, todo),
        Ok(None) => ApiError::NotFound.into_response(),
        Err(err) => {
            tracing::error!(error = %err, id, "failed to fetch todo");
            ApiError::FetchFailed.into_response()
        }
    }
}

/// PUT /todos/{id}
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    let input = match decode_body(&body) {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };

    match store::update(&state.pool, id, &input).await {
        Ok(0) => ApiError::UpdateMissing.into_response(),
        Ok(_) => ok_envelope(StatusCode::OK, serde_json::Value::Null),
        Err(err) => {
            tracing::error!(error = %err, id, "failed to update todo");
            ApiError::UpdateFailed.into_response()
        }
    }
}

/// DELETE /todos/{id}
pub async fn delete_todo(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match store::delete(&state.pool, id).await {
        Ok(0) => ApiError::DeleteMissing.into_response(),
        Ok(_) => ok_envelope(StatusCode::OK, serde_json::Value::Null),
        Err(err) => {
            tracing::error!(error = %err, id, "failed to delete todo");
            ApiError::DeleteFailed.into_response()
        }
    }
}

/// Fallback for unknown paths.
pub async fn route_not_found() -> Response {
    ApiError::RouteNotFound.into_response()
}

/// Fallback for known paths with an unsupported method.
pub async fn method_not_allowed() -> Response {
    ApiError::MethodNotAllowed.into_response()
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::InvalidId)
}

fn decode_body(body: &Bytes) -> Result<TodoInput, ApiError> {
    let input: TodoInput =
        serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)?;
    validate_input(&input)?;
    Ok(input)
}
