//! # office2pdf
//!
//! Upload an office document over HTTP and get a PDF back, using LibreOffice's
//! headless `soffice` as the converter.
//!
//! The crate itself does no document processing. It stores the upload, runs
//!
//! ```text
//! soffice --headless --convert-to pdf --outdir <upload_dir> <upload_dir>/<name>
//! ```
//!
//! and checks that `<upload_dir>/<stem>.pdf` appeared. LibreOffice is found on
//! the host (or installed on first use) by the companion `soffice-auto` crate.
//!
//! ## Request Flow
//!
//! ```text
//! POST /upload (multipart "file")
//!  │
//!  ├─ 1. Upload   sanitise the file name, stream the body to upload_dir
//!  ├─ 2. Locate   explicit path, SOFFICE_PATH, PATH, or install (spawn_blocking)
//!  ├─ 3. Invoke   one soffice run under a timeout
//!  └─ 4. Verify   the PDF exists → {"info", "file_name", "pdf_path"}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use office2pdf::{serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     serve(ServerConfig::default()).await?;
//!     Ok(())
//! }
//! ```
//!
//! Or convert a file without the server:
//!
//! ```rust,no_run
//! use office2pdf::{convert_to_pdf, ConversionConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pdf = convert_to_pdf("slides.pptx", "out", &ConversionConfig::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `office2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when embedding the router in another service:
//! ```toml
//! office2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, ServerConfig};
pub use convert::{convert_sync, convert_to_pdf};
pub use error::Office2PdfError;
pub use pipeline::locate::{tool_status, ToolStatus};
pub use server::{router, serve, ApiError, AppState, HealthResponse, UploadResponse};
pub use soffice_auto::InstallPolicy;
