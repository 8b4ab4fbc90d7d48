// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::engine::EngineError;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 403 Forbidden (e.g., submitting for a step that is still locked)
    Forbidden(String),

    // 404 Not Found
    NotFound(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::InternalServerError(_) => "internal_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::AuthError(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
/// `detail` carries the same message as `error`; the web client reads `detail`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        let body = Json(json!({
            "error": error_message,
            "detail": error_message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

/// Maps engine failures onto their client-visible HTTP status.
impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::DomainNotFound(_) | EngineError::StepNotFound { .. } => {
                AppError::NotFound(err.to_string())
            }
            EngineError::StepLocked { .. } => AppError::Forbidden(err.to_string()),
            EngineError::InvalidAnswerShape(_) => AppError::BadRequest(err.to_string()),
            EngineError::Storage(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_locked_maps_to_forbidden() {
        let err = AppError::from(EngineError::StepLocked {
            domain: "Backend".to_string(),
            step_index: 3,
            unlocked_index: 2,
        });
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_catalog_misses_map_to_not_found() {
        let domain = AppError::from(EngineError::DomainNotFound("Nope".to_string()));
        assert_eq!(domain.into_response().status(), StatusCode::NOT_FOUND);

        let step = AppError::from(EngineError::StepNotFound {
            domain: "Backend".to_string(),
            step_index: 9,
        });
        assert_eq!(step.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_answer_shape_is_bad_request() {
        let err = AppError::from(EngineError::InvalidAnswerShape("object".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_failure_is_internal_error() {
        let err = AppError::from(EngineError::Storage(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, AppError::InternalServerError(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
