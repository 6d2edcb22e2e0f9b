//! Pipeline stages for document-to-PDF conversion.
//!
//! One submodule per step. The HTTP layer calls them in order.
//!
//! ## Data Flow
//!
//! ```text
//! upload ──▶ locate ──▶ invoke
//! (store)    (soffice)  (run + check output)
//! ```
//!
//! 1. [`upload`] — sanitise the client's file name and stream the body to
//!    the upload folder
//! 2. [`locate`] — find `soffice`, installing LibreOffice through
//!    `soffice-auto` when allowed; runs in `spawn_blocking` because installs
//!    shell out and download synchronously
//! 3. [`invoke`] — run `soffice --headless --convert-to pdf` with a timeout

pub mod invoke;
pub mod locate;
pub mod upload;
