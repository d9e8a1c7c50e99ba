//! Unified error handling for the HTTP surface.
//!
//! Every handler returns `Result<T, AppError>`. Layer-specific errors
//! (repositories, token service, validation) fold into `AppError` via `From`
//! impls, and the `IntoResponse` impl renders every failure as a JSON
//! `{error, code}` body with the matching status code. Internal failures are
//! logged and reduced to a generic 500 message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::jwt::JwtError;
use crate::auth::service::AuthError;
use crate::db::repositories::{ProductRepositoryError, UserRepositoryError};
use crate::validation::ValidationError;

/// Application-level error type shared by all route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input (includes duplicate email).
    #[error("{0}")]
    Validation(String),

    /// No bearer token was presented.
    #[error("{0}")]
    Unauthorized(String),

    /// Token verification failed or the role is insufficient.
    #[error("{0}")]
    Forbidden(String),

    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Database or other unexpected failure; detail is logged, not exposed.
    #[error("internal server error")]
    Internal(String),
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!(error = %detail, "request failed");
        }

        let body = ApiError::new(self.to_string(), self.code());

        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<UserRepositoryError> for AppError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::NotFound => AppError::NotFound("user not found".to_string()),
            // Duplicate email is reported as invalid input, not a conflict
            UserRepositoryError::EmailAlreadyExists => {
                AppError::Validation("email already registered".to_string())
            }
            UserRepositoryError::HashingError(e) => AppError::Internal(e),
            UserRepositoryError::DatabaseError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ProductRepositoryError> for AppError {
    fn from(err: ProductRepositoryError) -> Self {
        match err {
            ProductRepositoryError::NotFound => {
                AppError::NotFound("product not found".to_string())
            }
            ProductRepositoryError::DatabaseError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AppError::Forbidden("token expired".to_string()),
            JwtError::InvalidSignature => AppError::Forbidden("invalid token".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::Unauthorized("invalid credentials".to_string())
            }
            AuthError::UserNotFound => AppError::NotFound("user not found".to_string()),
            AuthError::Internal(e) => AppError::Internal(e),
        }
    }
}
