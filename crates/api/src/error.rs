//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures unexpected errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; business-rule violations come back as structured
//! 4xx JSON bodies, everything unexpected as an opaque 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, OrderError, OtpError, PaymentError, WorkshopError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// One-time-code gate failed.
    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    /// Payment verification failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Order lifecycle operation failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Workshop operation failed.
    #[error("Workshop error: {0}")]
    Workshop(#[from] WorkshopError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is unexpected (infrastructure rather than a
    /// business-rule violation).
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Auth(AuthError::Repository(_) | AuthError::PasswordHash) => true,
            Self::Otp(OtpError::Repository(_)) => true,
            Self::Order(OrderError::Repository(_) | OrderError::Otp(OtpError::Repository(_))) => {
                true
            }
            Self::Workshop(WorkshopError::Repository(_)) => true,
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        if self.is_server_error() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }

        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::EmailNotVerified => StatusCode::FORBIDDEN,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Otp(OtpError::UserNotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Order(err) => match err {
                OrderError::NotFound | OrderError::Otp(OtpError::UserNotFound) => {
                    StatusCode::NOT_FOUND
                }
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Workshop(err) => match err {
                WorkshopError::NotFound | WorkshopError::RegistrationNotFound => {
                    StatusCode::NOT_FOUND
                }
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details never leak.
    fn message(&self) -> String {
        if self.is_server_error() {
            return "Internal server error".to_string();
        }

        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Otp(err) => err.to_string(),
            Self::Payment(err) => err.to_string(),
            Self::Order(err) => err.to_string(),
            Self::Workshop(err) => err.to_string(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture unexpected errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = Json(json!({ "msg": self.message() }));
        (self.status(), body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_business_rule_violations_are_400() {
        assert_eq!(
            status_of(AppError::Order(OrderError::AlreadyCancelled)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Order(OrderError::AlreadyDelivered)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Order(OrderError::InvalidSequence)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Workshop(WorkshopError::DuplicateRegistration)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Workshop(WorkshopError::InsufficientSeats)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Workshop(WorkshopError::HasBookings)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Otp(OtpError::InvalidCode)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Otp(OtpError::ExpiredCode)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Payment(PaymentError::SignatureMismatch)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_entities_are_404() {
        assert_eq!(
            status_of(AppError::Order(OrderError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Workshop(WorkshopError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Otp(OtpError::UserNotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_unexpected_failures_are_opaque_500() {
        let err = AppError::Database(RepositoryError::DataCorruption("details".to_string()));
        assert!(err.is_server_error());
        assert_eq!(err.message(), "Internal server error");
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_auth_mapping() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::EmailNotVerified)),
            StatusCode::FORBIDDEN
        );
    }
}
