use super::error::FormatError;
use super::layout::{self, LayoutSpec};

/// Resolve the capture layout for a buffer of exactly `buffer_length` bytes.
///
/// There is no tolerance window: the length must equal one of the known
/// file sizes.
///
/// # Examples
/// ```
/// use hsdcube_core::formats::{CameraModel, resolve};
///
/// let layout = resolve(14_805_000).unwrap();
/// assert_eq!(layout.camera, CameraModel::Custom);
/// assert!(resolve(14_805_001).is_err());
/// ```
///
/// # Errors
/// Returns `FormatError::UnsupportedFormat` carrying the offending length.
pub fn resolve(buffer_length: u64) -> Result<LayoutSpec, FormatError> {
    match buffer_length {
        layout::HSC180X_FILE_SIZE => Ok(layout::HSC180X),
        layout::HSC170X_LEGACY_FILE_SIZE => Ok(layout::HSC170X_LEGACY),
        layout::HSC170X_FILE_SIZE => Ok(layout::HSC170X),
        layout::HSC180X_CL_FILE_SIZE => Ok(layout::HSC180X_CL),
        layout::CUSTOM_FILE_SIZE => Ok(layout::CUSTOM),
        length => Err(FormatError::UnsupportedFormat { length }),
    }
}

pub fn is_supported(buffer_length: u64) -> bool {
    resolve(buffer_length).is_ok()
}

/// All known layouts, in registry order.
pub fn supported_layouts() -> &'static [LayoutSpec] {
    &layout::LAYOUTS
}
