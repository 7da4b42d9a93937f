//! Capture payload decoding.
//!
//! Decoding follows the same split as the rest of the crate:
//! - `reader`: header/payload split and sample conversion (no shaping)
//! - `parser`: shaping into storage order and the axis permutation to the
//!   canonical (height, width, depth) cube
//! - `error`: explicit decode errors
//!
//! The header is only measured, never parsed. Two-byte samples are
//! little-endian and the legacy downcast keeps the low byte of each sample.

pub mod error;
pub mod parser;
pub mod reader;

pub use error::DecodeError;
pub use parser::decode;
