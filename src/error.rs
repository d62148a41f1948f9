//! HTTP-facing error taxonomy.
//!
//! Client errors are rendered into the envelope as-is. Unexpected failures
//! are logged with full detail and carry the underlying message in `error`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::{auth::validation::FieldError, response::Envelope};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{context}: {reason:#}")]
    Unexpected {
        context: &'static str,
        reason: anyhow::Error,
    },
}

impl AppError {
    pub fn unexpected(context: &'static str, reason: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected {
            context,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation(errors) => Envelope {
                errors: Some(errors),
                ..Envelope::failure("Validation failed")
            },
            AppError::MalformedBody(message) => Envelope::failure(message),
            AppError::Unexpected { context, reason } => {
                error!(error = ?reason, context, "request failed unexpectedly");
                Envelope {
                    error: Some(format!("{reason:#}")),
                    ..Envelope::failure(context)
                }
            }
            other => Envelope::failure(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}
