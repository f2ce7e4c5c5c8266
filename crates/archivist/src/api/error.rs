//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::ArchivistError;

use super::types::ErrorResponse;

/// An [`ArchivistError`] rendered as an HTTP status and JSON body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, error_type: &str, message: String) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error_type: error_type.to_string(),
                message,
                status_code: status.as_u16(),
            },
        }
    }

    pub fn validation(error: ArchivistError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "ValidationError", error.to_string())
    }

    pub fn internal(error: ArchivistError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "InternalError", error.to_string())
    }
}

impl From<ArchivistError> for ApiError {
    fn from(error: ArchivistError) -> Self {
        match &error {
            ArchivistError::Validation { .. } => Self::validation(error),
            ArchivistError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "NotFoundError", error.to_string()),
            ArchivistError::UnsupportedFormat(_) => Self::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UnsupportedFormatError",
                error.to_string(),
            ),
            ArchivistError::Parsing { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "ParsingError", error.to_string())
            }
            _ => Self::internal(error),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::internal(ArchivistError::Other(format!("Handler task failed: {}", error)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!("{}", self.body.message);
        }
        (self.status, Json(self.body)).into_response()
    }
}
