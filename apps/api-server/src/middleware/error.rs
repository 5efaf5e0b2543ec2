//! Error handling - maps failures onto HTTP responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::StoreError;
use quill_core::ports::AuthError;
use quill_shared::{AuthErrorBody, ErrorResponse};
use std::fmt;

/// Application-level error type.
///
/// Authentication failures keep the identity provider's `{code, message}`
/// body; everything else renders RFC 7807 problem details.
#[derive(Debug)]
pub enum AppError {
    Unauthenticated(AuthError),
    Forbidden,
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthenticated(err) => write!(f, "Unauthenticated: {}", err),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated(err) => {
                HttpResponse::build(self.status_code()).json(AuthErrorBody {
                    code: err.code().to_string(),
                    message: err.to_string(),
                })
            }
            AppError::Forbidden => HttpResponse::build(self.status_code()).json(
                ErrorResponse::forbidden().with_detail("This account may not create posts."),
            ),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                HttpResponse::build(self.status_code()).json(ErrorResponse::internal_error())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Connection(msg) => {
                tracing::error!("Store connection error: {}", msg);
                AppError::Internal("Store unavailable".to_string())
            }
            StoreError::Request(msg) => {
                tracing::error!("Store request error: {}", msg);
                AppError::Internal("Store error".to_string())
            }
            StoreError::Decode(msg) => {
                tracing::error!("Stored data malformed: {}", msg);
                AppError::Internal("Store error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
