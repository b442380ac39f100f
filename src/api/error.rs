//! API error type and the mapping from [`crate::errors::Error`].
//!
//! Every error response has the same JSON shape, `{ "code", "message" }`.
//! Internal failures are logged here and reach the client as a generic
//! message.

use crate::api::types::ErrorResponse;
use crate::errors::Error;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Status code plus JSON body, returned by every handler on failure.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn api_validation(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn api_unauthorized(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

pub fn api_forbidden(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::FORBIDDEN, "forbidden", message)
}

pub fn api_not_found(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not_found", message)
}

/// 409 with a caller-chosen code (`conflict`, `invalid_state`, ...).
pub fn api_conflict(code: &str, message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::CONFLICT, code, message)
}

pub fn api_internal(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation { .. } | Error::InvalidQuantity { .. } => {
                api_validation(err.to_string())
            }
            Error::Unauthorized { message } => api_unauthorized(message),
            Error::Forbidden { message } => api_forbidden(message),
            Error::NotFound { .. } | Error::ItemNotFound { .. } => api_not_found(err.to_string()),
            Error::Conflict { message } => api_conflict("conflict", message),
            Error::InvalidState { message } => api_conflict("invalid_state", message),
            Error::InsufficientStock { .. } => api_conflict("insufficient_stock", err.to_string()),
            other => {
                tracing::error!(error = %other, "request failed");
                api_internal("internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let cases = [
            (Error::validation("bad"), StatusCode::BAD_REQUEST, "validation_error"),
            (
                Error::InvalidQuantity { quantity: f64::NAN },
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (Error::not_found("user", 3), StatusCode::NOT_FOUND, "not_found"),
            (
                Error::InsufficientStock {
                    current: 1,
                    requested: -2,
                },
                StatusCode::CONFLICT,
                "insufficient_stock",
            ),
            (
                Error::InvalidState {
                    message: "done".to_string(),
                },
                StatusCode::CONFLICT,
                "invalid_state",
            ),
            (
                Error::Config {
                    message: "secret detail".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
            ),
        ];

        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status, status);
            assert_eq!(api.body.code, code);
        }
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let api: ApiError = Error::Config {
            message: "secret detail".to_string(),
        }
        .into();
        assert!(!api.body.message.contains("secret"));
    }
}
