//! Capture layout detection.
//!
//! Capture files carry no magic number or format tag: the camera layout is
//! inferred solely from the total file length. Each supported camera has a
//! fixed record in `layout` (dimensions, sample width, downcast rule,
//! storage order), and `registry` maps an exact byte length to that record.
//!
//! Lookups are pure and contain no I/O; an unknown length is reported as
//! `FormatError::UnsupportedFormat` and decoding must not proceed.

pub mod error;
pub mod layout;
pub mod registry;

pub use error::FormatError;
pub use layout::{CameraModel, Interleave, LayoutSpec, SampleWidth};
pub use registry::{is_supported, resolve, supported_layouts};
