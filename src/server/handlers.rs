//! Route handlers: `POST /upload` and `GET /health`.

use super::error::ApiError;
use super::AppState;
use crate::convert::convert_to_pdf;
use crate::error::Office2PdfError;
use crate::pipeline::locate::{tool_status, ToolStatus};
use crate::pipeline::upload::{self, sanitize_file_name, UploadStoreError, FALLBACK_FILE_NAME};
use axum::{
    extract::{multipart::Field, multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

/// Body of a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable summary.
    pub info: String,
    /// Name the upload was stored under.
    pub file_name: String,
    /// Location of the generated PDF.
    pub pdf_path: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub tool: ToolStatus,
}

/// Accept one document, store it, and convert it to PDF.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;
    let limit = state.config.max_upload_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }
        return store_and_convert(&state, field).await.map(Json);
    }

    Err(ApiError::MissingFile)
}

async fn store_and_convert(
    state: &AppState,
    field: Field<'_>,
) -> Result<UploadResponse, ApiError> {
    let upload_dir = &state.config.upload_dir;
    let file_name = match field.file_name().map(str::trim) {
        Some(raw) if !raw.is_empty() => sanitize_file_name(raw)?,
        _ => FALLBACK_FILE_NAME.to_string(),
    };

    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|source| Office2PdfError::OutputDirFailed {
            path: upload_dir.clone(),
            source,
        })?;

    let dest = upload_dir.join(&file_name);
    let size = upload::store_stream(&dest, field)
        .await
        .map_err(|e| match e {
            UploadStoreError::Payload(err) => {
                ApiError::from_multipart(err, state.config.max_upload_bytes)
            }
            UploadStoreError::Write(source) => Office2PdfError::UploadWriteFailed {
                path: dest.clone(),
                source,
            }
            .into(),
        })?;
    info!("Stored upload '{}' ({} bytes)", file_name, size);

    let pdf = convert_to_pdf(&dest, upload_dir, &state.config.conversion).await?;

    Ok(UploadResponse {
        info: format!(
            "File '{}' converted to PDF at '{}'",
            file_name,
            pdf.display()
        ),
        file_name,
        pdf_path: pdf.display().to_string(),
    })
}

/// Report whether the conversion tool is present. Never installs it.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let tool = tool_status(&state.config.conversion).await;
    Json(HealthResponse { status: "ok", tool })
}
