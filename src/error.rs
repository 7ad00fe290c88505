// src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    /// Operation not permitted given the entity's current state (400).
    InvalidState(String),
    Internal { message: String, detail: String },
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        AppError::InvalidState(msg.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        AppError::Internal {
            message: "Internal server error".to_string(),
            detail: detail.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "message": msg })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "message": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::InvalidState(msg) => (StatusCode::BAD_REQUEST, json!({ "message": msg })),
            AppError::Internal { message, detail } => {
                tracing::error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": message, "error": detail }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found("Document not found"),
            StoreError::PreconditionFailed => {
                AppError::invalid_state("Operation not permitted in the current state")
            }
            StoreError::Backend(detail) => AppError::internal(detail),
        }
    }
}
