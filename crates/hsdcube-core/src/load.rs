use std::path::Path;

use thiserror::Error;

use crate::cube::Cube;
use crate::decode::{DecodeError, decode};
use crate::formats::{FormatError, LayoutSpec, resolve};
use crate::source::{CaptureFile, SourceError};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Source(#[from] SourceError),
    #[error("{0}")]
    Format(#[from] FormatError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl LoadError {
    /// The unsupported length, when the failure is a size mismatch.
    pub fn unsupported_length(&self) -> Option<u64> {
        match self {
            LoadError::Format(FormatError::UnsupportedFormat { length })
            | LoadError::Source(SourceError::Format(FormatError::UnsupportedFormat { length })) => {
                Some(*length)
            }
            _ => None,
        }
    }
}

/// A decoded capture: the canonical cube plus its layout metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCapture {
    pub layout: LayoutSpec,
    pub header_len: u64,
    pub cube: Cube,
    pub height: u32,
    pub width: u32,
}

/// Resolve the layout of `buffer` from its length and decode it.
///
/// # Examples
/// ```
/// use hsdcube_core::{LoadError, decode_capture};
///
/// let err = decode_capture(&[0u8; 16]).unwrap_err();
/// assert!(matches!(err, LoadError::Format(_)));
/// assert_eq!(err.to_string(), "unsupported file size: 16 bytes");
/// ```
pub fn decode_capture(buffer: &[u8]) -> Result<DecodedCapture, LoadError> {
    let layout = resolve(buffer.len() as u64)?;
    decode_with_layout(buffer, layout)
}

/// Open, size-check, read and decode a capture file.
pub fn load_capture_file(path: &Path) -> Result<DecodedCapture, LoadError> {
    let capture = CaptureFile::open(path)?;
    load_capture(&capture)
}

pub fn load_capture(capture: &CaptureFile) -> Result<DecodedCapture, LoadError> {
    let buffer = capture.read()?;
    decode_with_layout(&buffer, *capture.layout())
}

fn decode_with_layout(buffer: &[u8], layout: LayoutSpec) -> Result<DecodedCapture, LoadError> {
    let buffer_len = buffer.len() as u64;
    let header_len = layout
        .header_len_for(buffer_len)
        .ok_or(DecodeError::BufferTooShort {
            needed: layout.payload_len(),
            actual: buffer_len,
        })?;
    let cube = decode(buffer, &layout)?;
    Ok(DecodedCapture {
        layout,
        header_len,
        cube,
        height: layout.height,
        width: layout.width,
    })
}
