//! # Posts API Errors
//!
//! Error type returned by the post handlers and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use super::validator::ValidationErrors;
use crate::observability::{log_event, Event};
use crate::store::StoreError;

/// Result type for post handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Posts API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// No post with the requested id
    #[error("Post not found")]
    NotFound,

    /// Payload failed field validation
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Record store failure
    #[error("Internal error: {0}")]
    Store(#[from] StoreError),

    /// Blocking store task panicked or was cancelled
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Generic error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// 422 body: summary message plus per-field messages
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub message: String,
    pub errors: ValidationErrors,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::Validation(errors) => {
                let fields = errors.field_names().join(",");
                log_event(Event::ValidationFailed, &[("fields", fields.as_str())]);

                let body = ValidationErrorResponse {
                    message: errors.to_string(),
                    errors,
                };
                (status, Json(body)).into_response()
            }
            other => {
                let code = match &other {
                    ApiError::Store(e) => Some(e.code()),
                    ApiError::Internal(_) => Some("POSTD_STORE_TASK_FAILED"),
                    _ => None,
                };
                if let Some(code) = code {
                    let message = other.to_string();
                    log_event(
                        Event::StoreFailed,
                        &[("code", code), ("error", message.as_str())],
                    );
                }
                let body = ErrorResponse {
                    error: other.to_string(),
                    code: status.as_u16(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("task cancelled".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Validation(ValidationErrors::new()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Store(StoreError::Poisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_converts() {
        let err: ApiError = StoreError::Poisoned.into();
        assert!(err.to_string().contains("lock poisoned"));
    }

    #[test]
    fn test_validation_message() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "The title field is required.");
        let err = ApiError::from(errors);
        assert_eq!(err.to_string(), "The given data was invalid.");
    }
}
