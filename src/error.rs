//! Error types for the office2pdf library.
//!
//! [`Office2PdfError`] covers every way a conversion can fail: the input is
//! missing, the tool is unavailable, the tool ran but failed, or its output
//! never appeared. The HTTP layer maps these onto status codes in
//! [`crate::server::ApiError`].

use soffice_auto::SofficeAutoError;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the office2pdf library.
#[derive(Debug, Error)]
pub enum Office2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input document was not found at the given path.
    #[error("Input document not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// Uploaded file name is empty or not a plain file name.
    #[error("Invalid file name '{name}'")]
    InvalidFileName { name: String },

    /// Could not write the uploaded document to the upload folder.
    #[error("Failed to store upload at '{path}': {source}")]
    UploadWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Tool errors ───────────────────────────────────────────────────────
    /// The conversion tool could not be located or installed.
    #[error(
        "LibreOffice is unavailable: {0}\n\n\
LibreOffice is normally located on PATH or installed automatically.\n\
If that failed, you can:\n\
  • Install LibreOffice with your package manager and retry.\n\
  • Set SOFFICE_PATH=/path/to/soffice to use an existing copy.\n"
    )]
    ToolUnavailable(#[from] SofficeAutoError),

    /// An explicitly configured tool path does not exist.
    #[error("Configured soffice path '{path}' does not exist")]
    ToolPathMissing { path: PathBuf },

    /// The tool process could not be started.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tool exited unsuccessfully.
    #[error("Error during conversion: soffice exited with {}{}", fmt_status(.status), fmt_stderr(.stderr))]
    ToolFailed { status: Option<i32>, stderr: String },

    /// The tool ran longer than the configured timeout and was killed.
    #[error("Conversion timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The tool exited successfully but produced no PDF.
    #[error("PDF not generated at {path}.")]
    OutputMissing { path: PathBuf },

    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Server errors ─────────────────────────────────────────────────────
    /// The HTTP listener could not bind or stopped with an I/O error.
    #[error("Server error on {addr}: {source}")]
    Server {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

fn fmt_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {code}"),
        None => "a signal".to_string(),
    }
}

fn fmt_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failed_display_with_stderr() {
        let e = Office2PdfError::ToolFailed {
            status: Some(81),
            stderr: "  Error: source file could not be loaded\n".into(),
        };
        assert_eq!(
            e.to_string(),
            "Error during conversion: soffice exited with exit status 81: Error: source file could not be loaded"
        );
    }

    #[test]
    fn tool_failed_display_killed_by_signal() {
        let e = Office2PdfError::ToolFailed {
            status: None,
            stderr: String::new(),
        };
        assert_eq!(
            e.to_string(),
            "Error during conversion: soffice exited with a signal"
        );
    }

    #[test]
    fn output_missing_display() {
        let e = Office2PdfError::OutputMissing {
            path: PathBuf::from("uploaded_docs/report.pdf"),
        };
        assert_eq!(e.to_string(), "PDF not generated at uploaded_docs/report.pdf.");
    }

    #[test]
    fn tool_unavailable_carries_hint() {
        let e: Office2PdfError = SofficeAutoError::NotFound.into();
        let msg = e.to_string();
        assert!(msg.contains("LibreOffice installation failed or not found."));
        assert!(msg.contains("SOFFICE_PATH"));
    }

    #[test]
    fn timeout_display() {
        let e = Office2PdfError::Timeout { secs: 120 };
        assert!(e.to_string().contains("120s"));
    }
}
