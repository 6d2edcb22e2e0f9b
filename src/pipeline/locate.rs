//! Tool resolution: find the `soffice` binary a conversion will run.
//!
//! An explicit path in [`ConversionConfig`] always wins. Otherwise the lookup
//! (and a possible LibreOffice install) is delegated to `soffice-auto`, on a
//! `spawn_blocking` thread because installers download and shell out
//! synchronously.

use crate::config::ConversionConfig;
use crate::error::Office2PdfError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

static RE_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*LibreOffice\S*\s+(\d+(?:\.\d+)+)").unwrap());

/// Resolve the `soffice` binary for a conversion, installing it if allowed.
pub async fn resolve_tool(config: &ConversionConfig) -> Result<PathBuf, Office2PdfError> {
    if let Some(ref path) = config.soffice_path {
        if path.is_file() {
            return Ok(path.clone());
        }
        return Err(Office2PdfError::ToolPathMissing { path: path.clone() });
    }

    let policy = config.install_policy;
    let path = tokio::task::spawn_blocking(move || soffice_auto::ensure_soffice(policy, None))
        .await
        .map_err(|e| Office2PdfError::Internal(format!("Tool lookup task panicked: {}", e)))??;

    debug!("Using soffice at {}", path.display());
    Ok(path)
}

/// What the host currently has installed. Never triggers an install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// Path to `soffice`, if found.
    pub soffice: Option<PathBuf>,
    /// Version reported by `soffice --version`, if it could be read.
    pub version: Option<String>,
}

/// Locate the tool without installing it and probe its version.
pub async fn tool_status(config: &ConversionConfig) -> ToolStatus {
    let soffice = match config.soffice_path {
        Some(ref p) if p.is_file() => Some(p.clone()),
        Some(_) => None,
        None => tokio::task::spawn_blocking(soffice_auto::find_soffice)
            .await
            .unwrap_or_else(|e| {
                warn!("Tool lookup task panicked: {}", e);
                None
            }),
    };

    let version = match soffice {
        Some(ref p) => probe_version(p).await,
        None => None,
    };

    ToolStatus { soffice, version }
}

async fn probe_version(program: &Path) -> Option<String> {
    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(VERSION_PROBE_TIMEOUT, output).await {
        Ok(Ok(out)) if out.status.success() => parse_version(&String::from_utf8_lossy(&out.stdout)),
        Ok(Ok(out)) => {
            debug!("{} --version exited with {}", program.display(), out.status);
            None
        }
        Ok(Err(e)) => {
            warn!("Could not run {} --version: {}", program.display(), e);
            None
        }
        Err(_) => {
            warn!("{} --version timed out", program.display());
            None
        }
    }
}

/// Extract the version number from `soffice --version` output.
///
/// Falls back to the first non-empty line for forks that print a different
/// banner.
pub fn parse_version(output: &str) -> Option<String> {
    if let Some(caps) = RE_VERSION.captures(output) {
        return Some(caps[1].to_string());
    }
    output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
