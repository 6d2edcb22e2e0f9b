//! Conversion entry points.
//!
//! [`convert_to_pdf`] is the whole invoker: resolve the tool, run it once,
//! confirm the PDF exists. There is no retry; a failure is reported as-is.

use crate::config::ConversionConfig;
use crate::error::Office2PdfError;
use crate::pipeline::{invoke, locate};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Convert the document at `input` to PDF, writing into `outdir`.
///
/// # Returns
/// The path of the generated PDF, `<outdir>/<input stem>.pdf`.
///
/// # Errors
/// - the input does not exist
/// - `soffice` cannot be found or installed
/// - `soffice` fails, times out, or exits without writing the PDF
///
/// # Example
/// ```rust,no_run
/// use office2pdf::{convert_to_pdf, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pdf = convert_to_pdf("letter.docx", "out", &ConversionConfig::default()).await?;
/// println!("{}", pdf.display());
/// # Ok(())
/// # }
/// ```
pub async fn convert_to_pdf(
    input: impl AsRef<Path>,
    outdir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<PathBuf, Office2PdfError> {
    let start = Instant::now();
    let input = input.as_ref();
    let outdir = outdir.as_ref();
    info!("Starting conversion: {}", input.display());

    if !input.is_file() {
        return Err(Office2PdfError::InputNotFound {
            path: input.to_path_buf(),
        });
    }

    tokio::fs::create_dir_all(outdir)
        .await
        .map_err(|source| Office2PdfError::OutputDirFailed {
            path: outdir.to_path_buf(),
            source,
        })?;

    let program = locate::resolve_tool(config).await?;
    let pdf_path = invoke::expected_pdf_path(input, outdir);

    // A PDF left over from an earlier upload would mask a silent failure.
    // Converting a PDF in place makes the output the input; keep that one.
    if pdf_path != input && tokio::fs::try_exists(&pdf_path).await.unwrap_or(false) {
        debug!("Removing stale output {}", pdf_path.display());
        tokio::fs::remove_file(&pdf_path)
            .await
            .map_err(|e| Office2PdfError::Internal(format!("Failed to remove stale PDF: {}", e)))?;
    }

    invoke::run_soffice(
        &program,
        input,
        outdir,
        Duration::from_secs(config.timeout_secs),
    )
    .await?;

    if !tokio::fs::try_exists(&pdf_path).await.unwrap_or(false) {
        return Err(Office2PdfError::OutputMissing { path: pdf_path });
    }

    info!(
        "Converted {} -> {} in {}ms",
        input.display(),
        pdf_path.display(),
        start.elapsed().as_millis()
    );
    Ok(pdf_path)
}

/// Synchronous wrapper around [`convert_to_pdf`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input: impl AsRef<Path>,
    outdir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<PathBuf, Office2PdfError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Office2PdfError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_to_pdf(input, outdir, config))
}
