//! Headerless raw dumps.
//!
//! A dump is the canonical cube permuted back to storage order and written
//! as a flat byte stream (2-byte samples little-endian), i.e. the exact
//! inverse of the decode permutation. Prepending a header of the right length
//! to a dump yields a buffer that decodes to the same cube.

use std::io::Write;

use ndarray::{Array2, Array3, Axis};
use thiserror::Error;

use crate::cube::Cube;
use crate::formats::Interleave;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `cube` in `interleave` storage order; returns the byte count.
///
/// Output is produced one outer storage slice at a time, so callers writing
/// to a file should wrap it in a `BufWriter`.
pub fn write_raw_dump<W: Write>(
    cube: &Cube,
    interleave: Interleave,
    writer: &mut W,
) -> Result<u64, DumpError> {
    match cube {
        Cube::U8(data) => write_storage(data, interleave, writer),
        Cube::U16(data) => write_storage(data, interleave, writer),
    }
}

/// In-memory variant of [`write_raw_dump`].
///
/// # Examples
/// ```
/// use hsdcube_core::{Cube, to_raw_bytes};
/// use hsdcube_core::formats::Interleave;
/// use ndarray::Array3;
///
/// // (height 1, width 2, depth 2): band-interleaved-by-line stores each
/// // band's row contiguously.
/// let data = Array3::from_shape_vec((1, 2, 2), vec![1u8, 2, 3, 4]).unwrap();
/// assert_eq!(to_raw_bytes(&Cube::U8(data), Interleave::Bil), vec![1, 3, 2, 4]);
/// ```
pub fn to_raw_bytes(cube: &Cube, interleave: Interleave) -> Vec<u8> {
    let mut out = Vec::with_capacity(cube.len() * cube.sample_width().bytes() as usize);
    match cube {
        Cube::U8(data) => extend_storage(data, interleave, &mut out),
        Cube::U16(data) => extend_storage(data, interleave, &mut out),
    }
    out
}

/// Write an NDVI raster as row-major little-endian `f32`.
pub fn write_ndvi_raw<W: Write>(raster: &Array2<f32>, writer: &mut W) -> Result<u64, DumpError> {
    let mut written = 0u64;
    let mut row_bytes = Vec::with_capacity(raster.ncols() * 4);
    for row in raster.rows() {
        row_bytes.clear();
        for &value in row {
            row_bytes.extend_from_slice(&value.to_le_bytes());
        }
        writer.write_all(&row_bytes)?;
        written += row_bytes.len() as u64;
    }
    Ok(written)
}

trait RawSample: Copy {
    const BYTES: usize;
    fn extend_le(self, out: &mut Vec<u8>);
}

impl RawSample for u8 {
    const BYTES: usize = 1;

    fn extend_le(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl RawSample for u16 {
    const BYTES: usize = 2;

    fn extend_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

fn write_storage<T: RawSample, W: Write>(
    data: &Array3<T>,
    interleave: Interleave,
    writer: &mut W,
) -> Result<u64, DumpError> {
    let storage = data.view().permuted_axes(interleave.storage_axes());
    let (_, rows, cols) = storage.dim();
    let mut slice_bytes = Vec::with_capacity(rows * cols * T::BYTES);
    let mut written = 0u64;
    for outer in storage.axis_iter(Axis(0)) {
        slice_bytes.clear();
        for &sample in outer.iter() {
            sample.extend_le(&mut slice_bytes);
        }
        writer.write_all(&slice_bytes)?;
        written += slice_bytes.len() as u64;
    }
    Ok(written)
}

fn extend_storage<T: RawSample>(data: &Array3<T>, interleave: Interleave, out: &mut Vec<u8>) {
    let storage = data.view().permuted_axes(interleave.storage_axes());
    for &sample in storage.iter() {
        sample.extend_le(out);
    }
}
