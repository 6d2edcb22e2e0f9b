//! Upload storage: turn a client-supplied file name into a safe local name
//! and stream the request body into the upload folder.

use crate::error::Office2PdfError;
use futures::{Stream, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Name used when the multipart field carries no file name.
pub const FALLBACK_FILE_NAME: &str = "upload.bin";

/// Most filesystems cap a single path component at 255 bytes.
const MAX_FILE_NAME_BYTES: usize = 255;

static RE_UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._ -]").unwrap());

/// Reduce a client file name to a plain, portable file name.
///
/// Keeps only the final path component (browsers on Windows may send
/// `C:\Users\me\report.docx`), and replaces anything outside
/// `[A-Za-z0-9._ -]` with `_`.
pub fn sanitize_file_name(raw: &str) -> Result<String, Office2PdfError> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned = RE_UNSAFE_CHARS.replace_all(last, "_").into_owned();

    if cleaned.is_empty() || cleaned == "." || cleaned == ".." || cleaned.len() > MAX_FILE_NAME_BYTES
    {
        return Err(Office2PdfError::InvalidFileName {
            name: raw.to_string(),
        });
    }

    if cleaned != raw {
        debug!("Sanitised upload name '{}' -> '{}'", raw, cleaned);
    }
    Ok(cleaned)
}

/// Failure while streaming an upload to disk.
#[derive(Debug, Error)]
pub enum UploadStoreError<E> {
    /// The request body stream yielded an error.
    #[error("upload stream failed: {0}")]
    Payload(E),

    /// Writing the file failed.
    #[error("failed to write upload: {0}")]
    Write(#[source] std::io::Error),
}

/// Stream `body` into `dest`, replacing any existing file.
///
/// Returns the number of bytes written. On failure the partial file is
/// removed.
pub async fn store_stream<S, B, E>(dest: &Path, body: S) -> Result<u64, UploadStoreError<E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(UploadStoreError::Write)?;

    let result = write_chunks(&mut file, body).await;
    drop(file);

    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(dest).await {
            warn!("Could not remove partial upload '{}': {}", dest.display(), e);
        }
    }
    result
}

async fn write_chunks<S, B, E>(
    file: &mut tokio::fs::File,
    body: S,
) -> Result<u64, UploadStoreError<E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let mut body = std::pin::pin!(body);
    let mut written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(UploadStoreError::Payload)?;
        let bytes = chunk.as_ref();
        file.write_all(bytes).await.map_err(UploadStoreError::Write)?;
        written += bytes.len() as u64;
    }

    file.flush().await.map_err(UploadStoreError::Write)?;
    Ok(written)
}
