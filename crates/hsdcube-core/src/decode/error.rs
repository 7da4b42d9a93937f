use thiserror::Error;

/// Errors returned by payload decoding.
///
/// # Examples
/// ```
/// use hsdcube_core::DecodeError;
///
/// let err = DecodeError::BufferTooShort { needed: 10, actual: 4 };
/// assert!(err.to_string().contains("buffer too short"));
/// ```
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("buffer too short: need {needed} payload bytes, got {actual}")]
    BufferTooShort { needed: u64, actual: u64 },
    #[error("cube shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
