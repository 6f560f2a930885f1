// error.rs

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use hyper::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::repositories::chat_repository::RepositoryError;

/// Errors surfaced at the HTTP boundary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A unique field already holds this value
    #[error("Conflict on {field}: {message}")]
    Conflict { field: &'static str, message: String },

    /// Body that could not be read as the expected JSON shape
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::RoomNameTaken(name) => AppError::Conflict {
                field: "name",
                message: format!("room with this name already exists: {name}"),
            },
            RepositoryError::RoomNotFound(_) => AppError::NotFound,
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
            }
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            AppError::Conflict { field, message } => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": { field: [message] } })),
            )
                .into_response(),
            AppError::MalformedBody(detail) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "errors": { "non_field_errors": [detail] } })),
            )
                .into_response(),
            AppError::Internal(detail) => {
                error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
