//! Configuration types for conversion and the HTTP server.
//!
//! Conversion behaviour is controlled through [`ConversionConfig`], built via
//! its [`ConversionConfigBuilder`]. The server wraps it in [`ServerConfig`]
//! together with the listen address and the upload folder.

use crate::error::Office2PdfError;
use serde::Serialize;
use soffice_auto::InstallPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default scratch folder for uploads and converted PDFs.
pub const DEFAULT_UPLOAD_DIR: &str = "uploaded_docs";

/// Default cap on an upload request body: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Configuration for a single document conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use office2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .timeout_secs(60)
///     .soffice_path("/usr/bin/soffice")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ConversionConfig {
    /// Explicit path to the `soffice` binary. If None, the tool is located
    /// (and possibly installed) by `soffice-auto`.
    pub soffice_path: Option<PathBuf>,

    /// Whether a missing LibreOffice may be installed. Default: Auto.
    #[serde(serialize_with = "serialize_policy")]
    pub install_policy: InstallPolicy,

    /// Wall-clock limit for one `soffice` run in seconds. Default: 120.
    ///
    /// A cold LibreOffice start plus a large spreadsheet can take most of a
    /// minute. The child is killed when the limit is reached.
    pub timeout_secs: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            soffice_path: None,
            install_policy: InstallPolicy::default(),
            timeout_secs: 120,
        }
    }
}

fn serialize_policy<S: serde::Serializer>(
    policy: &InstallPolicy,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(match policy {
        InstallPolicy::Auto => "auto",
        InstallPolicy::Never => "never",
    })
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn soffice_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.soffice_path = Some(path.into());
        self
    }

    pub fn install_policy(mut self, policy: InstallPolicy) -> Self {
        self.config.install_policy = policy;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Office2PdfError> {
        if self.config.timeout_secs == 0 {
            return Err(Office2PdfError::InvalidConfig(
                "Conversion timeout must be ≥ 1 second".into(),
            ));
        }
        if let Some(ref p) = self.config.soffice_path {
            if p.as_os_str().is_empty() {
                return Err(Office2PdfError::InvalidConfig(
                    "soffice path must not be empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

/// Configuration for the HTTP upload server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerConfig {
    /// Listen address. Default: `127.0.0.1:8000`.
    pub bind: SocketAddr,

    /// Folder holding both the uploads and their PDFs. Default: `uploaded_docs`.
    pub upload_dir: PathBuf,

    /// Largest accepted request body in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,

    /// Settings forwarded to every conversion.
    pub conversion: ConversionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            conversion: ConversionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Check the fields the builder cannot see.
    pub fn validate(&self) -> Result<(), Office2PdfError> {
        if self.max_upload_bytes == 0 {
            return Err(Office2PdfError::InvalidConfig(
                "Upload limit must be ≥ 1 byte".into(),
            ));
        }
        if self.upload_dir.as_os_str().is_empty() {
            return Err(Office2PdfError::InvalidConfig(
                "Upload folder must not be empty".into(),
            ));
        }
        Ok(())
    }
}
