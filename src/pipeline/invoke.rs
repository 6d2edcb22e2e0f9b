//! Run `soffice` to convert one document.
//!
//! The command line is fixed:
//!
//! ```text
//! soffice --headless --convert-to pdf --outdir <outdir> <input>
//! ```
//!
//! LibreOffice names the result after the input's stem and can exit 0
//! without writing anything (e.g. when another instance holds the user
//! profile), so callers must still check [`expected_pdf_path`].

use crate::error::Office2PdfError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Keep at most this much of the tool's stderr in error messages.
const MAX_STDERR_BYTES: usize = 4096;

/// Argument vector passed to `soffice`.
pub fn soffice_args(input: &Path, outdir: &Path) -> Vec<OsString> {
    vec![
        "--headless".into(),
        "--convert-to".into(),
        "pdf".into(),
        "--outdir".into(),
        outdir.as_os_str().to_owned(),
        input.as_os_str().to_owned(),
    ]
}

/// Where LibreOffice writes the PDF for `input`: `<outdir>/<stem>.pdf`.
pub fn expected_pdf_path(input: &Path, outdir: &Path) -> PathBuf {
    let mut name = input
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".pdf");
    outdir.join(name)
}

/// Run `program` on `input`, writing into `outdir`.
///
/// If the run outlives `timeout` the child is killed, and on unix so is every
/// process it started.
pub async fn run_soffice(
    program: &Path,
    input: &Path,
    outdir: &Path,
    timeout: Duration,
) -> Result<(), Office2PdfError> {
    let args = soffice_args(input, outdir);
    debug!("Running {} {:?}", program.display(), args);

    let mut command = Command::new(program);
    command
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // `soffice` is a launcher: oosplash and soffice.bin run as descendants.
    // A fresh process group lets a timeout take all of them down.
    #[cfg(unix)]
    command.process_group(0);

    let child = command.spawn().map_err(|source| Office2PdfError::Spawn {
        program: program.to_path_buf(),
        source,
    })?;
    let pid = child.id();

    // Dropping the wait future on timeout drops the child, which kills it.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result
            .map_err(|e| Office2PdfError::Internal(format!("Failed to wait for soffice: {}", e)))?,
        Err(_) => {
            kill_process_group(pid);
            return Err(Office2PdfError::Timeout {
                secs: timeout.as_secs(),
            });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        debug!("soffice: {}", stdout.trim());
    }

    if !output.status.success() {
        return Err(Office2PdfError::ToolFailed {
            status: output.status.code(),
            stderr: tail(&String::from_utf8_lossy(&output.stderr), MAX_STDERR_BYTES).to_string(),
        });
    }

    Ok(())
}

/// SIGKILL the process group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid.and_then(|p| i32::try_from(p).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        Ok(()) => debug!("Killed soffice process group {}", pid),
        // ESRCH: the whole group already exited.
        Err(nix::errno::Errno::ESRCH) => {}
        Err(e) => warn!("Could not kill soffice process group {}: {}", pid, e),
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

/// The last `max` bytes of `s`, cut on a char boundary.
fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
