//! HTTP upload server.
//!
//! ```text
//! POST /upload   multipart field `file`  →  {"info", "file_name", "pdf_path"} | {"error"}
//! GET  /health                          →  {"status", "soffice", "version"}
//! ```
//!
//! Use [`router`] to embed the routes in another axum app (or to drive them
//! in tests), or [`serve`] to run them standalone until Ctrl-C.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{HealthResponse, UploadResponse, FILE_FIELD};

use crate::config::ServerConfig;
use crate::error::Office2PdfError;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

/// Build the upload router.
pub fn router(state: Arc<AppState>) -> Router {
    let limit = state.config.max_upload_bytes;

    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the upload folder, bind, and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), Office2PdfError> {
    config.validate()?;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|source| Office2PdfError::OutputDirFailed {
            path: config.upload_dir.clone(),
            source,
        })?;

    let addr = config.bind;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| Office2PdfError::Server { addr, source })?;
    let local = listener
        .local_addr()
        .map_err(|source| Office2PdfError::Server { addr, source })?;

    info!("Upload folder: {}", config.upload_dir.display());
    info!("Upload limit: {} bytes", config.max_upload_bytes);
    info!("Server listening on http://{}", local);

    let app = router(Arc::new(AppState::new(config)));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| Office2PdfError::Server { addr: local, source })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
