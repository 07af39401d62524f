//! Error types for Inkpost
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;

use crate::forms::FormErrors;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("Resource not found")]
    NotFound,

    /// Authentication required (401)
    #[error("Authentication required")]
    Unauthorized,

    /// Authentication required for a browser-style request.
    ///
    /// Carries the path the user was trying to reach so the login
    /// page can send them back after authenticating.
    #[error("Authentication required")]
    AuthRedirect(String),

    /// Validation error (400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Form validation failure (422) with field-level errors
    #[error("Form validation failed")]
    Form(FormErrors),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Media storage error (500)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Encryption/signing error (500)
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to appropriate HTTP status code
    /// and JSON error body. Authentication failures on protected
    /// pages become redirects to the login page with a return path.
    fn into_response(self) -> Response {
        use axum::Json;

        use crate::metrics::ERRORS_TOTAL;

        match self {
            AppError::AuthRedirect(next) => {
                ERRORS_TOTAL
                    .with_label_values(&["auth_redirect", "unknown"])
                    .inc();
                let location = format!("/auth/login?next={}", urlencoding::encode(&next));
                Redirect::to(&location).into_response()
            }
            AppError::Form(errors) => {
                ERRORS_TOTAL.with_label_values(&["form", "unknown"]).inc();
                let body = Json(serde_json::json!({ "errors": errors }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            other => {
                let (status, error_message, error_type) = match &other {
                    AppError::NotFound => (StatusCode::NOT_FOUND, other.to_string(), "not_found"),
                    AppError::Unauthorized => {
                        (StatusCode::UNAUTHORIZED, other.to_string(), "unauthorized")
                    }
                    AppError::Validation(msg) => {
                        (StatusCode::BAD_REQUEST, msg.clone(), "validation")
                    }
                    AppError::Database(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error".to_string(),
                        "database",
                    ),
                    AppError::Storage(msg) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "storage")
                    }
                    AppError::Config(msg) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "config")
                    }
                    AppError::Encryption(msg) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), "encryption")
                    }
                    AppError::Internal(_) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                        "internal",
                    ),
                    AppError::AuthRedirect(_) | AppError::Form(_) => unreachable!(),
                };

                ERRORS_TOTAL
                    .with_label_values(&[error_type, "unknown"])
                    .inc();

                let body = Json(serde_json::json!({
                    "error": error_message,
                }));

                (status, body).into_response()
            }
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
