use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// One entry of the field-level validation error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: &'static str,
    pub param: &'static str,
}

/// Errors surfaced to the client. Each variant maps to exactly one wire
/// shape, so a handler branch that returns one of these terminates the
/// request with a single response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, detected before any store access.
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    /// Well-formed request rejected by current state: duplicate email on
    /// register, unknown email on login, profile with no records.
    #[error("{0}")]
    BadRequest(String),
    /// Referenced entity absent.
    #[error("{0}")]
    NotFound(String),
    /// Unexpected store or token-signing failure. The cause is logged at
    /// the response boundary; the body stays generic.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::Internal(e) => {
                error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "msg": "Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
