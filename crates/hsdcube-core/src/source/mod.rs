//! Capture file access.
//!
//! All file I/O lives here. A capture is opened by size first: the layout is
//! resolved from file metadata, so unsupported files are rejected before any
//! payload is read.

mod capture;

pub use capture::CaptureFile;

use thiserror::Error;

use crate::formats::FormatError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Format(#[from] FormatError),
    #[error("input is not a file: {path}")]
    NotAFile { path: String },
    #[error("file size changed while reading: expected {expected} bytes, got {actual}")]
    SizeChanged { expected: u64, actual: u64 },
}
