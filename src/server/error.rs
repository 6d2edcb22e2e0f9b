//! HTTP error mapping for the upload server.

use crate::error::Office2PdfError;
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file uploaded: expected a multipart field named 'file'")]
    MissingFile,

    #[error("Invalid upload form: {0}")]
    InvalidForm(String),

    #[error("Upload request is too large (limit is {limit_bytes} bytes)")]
    PayloadTooLarge { limit_bytes: usize },

    #[error(transparent)]
    Conversion(#[from] Office2PdfError),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    /// Map a multipart read failure, recognising the body-limit case.
    pub fn from_multipart(err: MultipartError, limit_bytes: usize) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge { limit_bytes },
            _ => ApiError::InvalidForm(err.body_text()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Conversion(e) => match e {
                Office2PdfError::InputNotFound { .. } | Office2PdfError::InvalidFileName { .. } => {
                    StatusCode::BAD_REQUEST
                }
                Office2PdfError::ToolUnavailable(_) | Office2PdfError::ToolPathMissing { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                Office2PdfError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                Office2PdfError::UploadWriteFailed { .. }
                | Office2PdfError::Spawn { .. }
                | Office2PdfError::ToolFailed { .. }
                | Office2PdfError::OutputMissing { .. }
                | Office2PdfError::OutputDirFailed { .. }
                | Office2PdfError::Server { .. }
                | Office2PdfError::InvalidConfig(_)
                | Office2PdfError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::InvalidForm(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Upload failed ({}): {}", status.as_u16(), self);
        } else {
            warn!("Rejected upload ({}): {}", status.as_u16(), self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
