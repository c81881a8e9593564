use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::response::ApiResponse;

/// Error kinds surfaced by the account service. The boundary maps each kind
/// to an HTTP status and a user-safe message; internal detail is only logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("username already taken")]
    DuplicateUsername,
    /// Deliberately identical for unknown username and wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    Unauthorized,
    #[error("user not found")]
    NotFound,
    #[error("password hashing failed")]
    Hashing(#[source] anyhow::Error),
    #[error("token signing failed")]
    Token(#[source] jsonwebtoken::errors::Error),
    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::DuplicateUsername
            | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Hashing(_) | ApiError::Token(_) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = ?self, "internal error");
            "internal server error".to_string()
        } else {
            warn!(error = %self, "request rejected");
            self.to_string()
        };
        ApiResponse::<()>::error(status, &message)
    }
}
