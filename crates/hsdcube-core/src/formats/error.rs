use thiserror::Error;

/// Errors returned by layout resolution.
///
/// # Examples
/// ```
/// use hsdcube_core::FormatError;
///
/// let err = FormatError::UnsupportedFormat { length: 12 };
/// assert_eq!(err.to_string(), "unsupported file size: 12 bytes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("unsupported file size: {length} bytes")]
    UnsupportedFormat { length: u64 },
    #[error("unknown camera model '{name}'")]
    UnknownCamera { name: String },
}
