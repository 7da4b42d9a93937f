use ndarray::Array3;

use crate::cube::Cube;
use crate::formats::{Interleave, LayoutSpec, SampleWidth};

use super::error::DecodeError;
use super::reader::{self, PayloadReader};

/// Decode a capture buffer into a canonical (height, width, depth) cube.
///
/// The header (everything before the trailing payload) is skipped without
/// inspection, so buffers that differ only in their header decode to the
/// same cube.
///
/// # Examples
/// ```
/// use hsdcube_core::decode;
/// use hsdcube_core::formats::{CameraModel, Interleave, LayoutSpec, SampleWidth};
///
/// let layout = LayoutSpec {
///     camera: CameraModel::Custom,
///     total_file_size: 10,
///     width: 2,
///     height: 2,
///     depth: 2,
///     sample_width: SampleWidth::U8,
///     needs_8bit_downcast: false,
///     interleave: Interleave::Bil,
/// };
/// let buffer = [0xaa, 0xbb, 0, 1, 10, 11, 2, 3, 12, 13];
/// let cube = decode(&buffer, &layout).unwrap();
/// assert_eq!(cube.shape(), (2, 2, 2));
/// assert_eq!(cube.get(0, 1, 1), Some(11));
/// ```
///
/// # Errors
/// Returns `DecodeError::BufferTooShort` when the buffer cannot hold the
/// layout's payload.
pub fn decode(buffer: &[u8], layout: &LayoutSpec) -> Result<Cube, DecodeError> {
    let reader = PayloadReader::new(buffer);
    let payload = reader.payload(layout.payload_len())?;
    let shape = layout.storage_shape();

    let cube = match layout.sample_width {
        SampleWidth::U8 => Cube::U8(to_canonical(
            Array3::from_shape_vec(shape, reader::u8_samples(payload))?,
            layout.interleave,
        )),
        SampleWidth::U16 if layout.needs_8bit_downcast => Cube::U8(to_canonical(
            Array3::from_shape_vec(shape, reader::u16_le_samples_truncated(payload))?,
            layout.interleave,
        )),
        SampleWidth::U16 => Cube::U16(to_canonical(
            Array3::from_shape_vec(shape, reader::u16_le_samples(payload))?,
            layout.interleave,
        )),
    };
    Ok(cube)
}

/// Strided transpose from storage order to (height, width, depth); no data moves.
fn to_canonical<T>(storage: Array3<T>, interleave: Interleave) -> Array3<T> {
    storage.permuted_axes(interleave.canonical_axes())
}

#[cfg(test)]
mod tests {
    use super::decode;
    use crate::cube::Cube;
    use crate::decode::error::DecodeError;
    use crate::formats::{CameraModel, Interleave, LayoutSpec, SampleWidth};

    const HEIGHT: u32 = 2;
    const WIDTH: u32 = 3;
    const DEPTH: u32 = 4;

    fn layout(sample_width: SampleWidth, downcast: bool, interleave: Interleave) -> LayoutSpec {
        let mut layout = LayoutSpec {
            camera: CameraModel::Custom,
            total_file_size: 0,
            width: WIDTH,
            height: HEIGHT,
            depth: DEPTH,
            sample_width,
            needs_8bit_downcast: downcast,
            interleave,
        };
        layout.total_file_size = layout.payload_len() + 5;
        layout
    }

    fn buffer_with_header(header: u8, payload: &[u8]) -> Vec<u8> {
        let mut buffer = vec![header; 5];
        buffer.extend_from_slice(payload);
        buffer
    }

    #[test]
    fn bil_storage_maps_to_canonical_axes() {
        let layout = layout(SampleWidth::U8, false, Interleave::Bil);
        let payload: Vec<u8> = (0..layout.sample_count() as u8).collect();
        let cube = decode(&buffer_with_header(0xee, &payload), &layout).unwrap();

        assert_eq!(cube.shape(), (2, 3, 4));
        let (w, d) = (WIDTH as usize, DEPTH as usize);
        for y in 0..HEIGHT as usize {
            for x in 0..w {
                for z in 0..d {
                    let stored = payload[y * d * w + z * w + x];
                    assert_eq!(cube.get(y, x, z), Some(u16::from(stored)));
                }
            }
        }
    }

    #[test]
    fn bsq_storage_maps_to_canonical_axes() {
        let layout = layout(SampleWidth::U8, false, Interleave::Bsq);
        let payload: Vec<u8> = (0..layout.sample_count() as u8).collect();
        let cube = decode(&buffer_with_header(0, &payload), &layout).unwrap();

        let (h, w) = (HEIGHT as usize, WIDTH as usize);
        for y in 0..h {
            for x in 0..w {
                for z in 0..DEPTH as usize {
                    let stored = payload[z * h * w + y * w + x];
                    assert_eq!(cube.get(y, x, z), Some(u16::from(stored)));
                }
            }
        }
    }

    #[test]
    fn u16_samples_decode_little_endian() {
        let layout = layout(SampleWidth::U16, false, Interleave::Bil);
        let mut payload = vec![0u8; layout.payload_len() as usize];
        payload[0] = 0x34;
        payload[1] = 0x12;
        let cube = decode(&buffer_with_header(0, &payload), &layout).unwrap();

        assert!(matches!(cube, Cube::U16(_)));
        assert_eq!(cube.get(0, 0, 0), Some(0x1234));
        assert_eq!(cube.len(), layout.sample_count() as usize);
    }

    #[test]
    fn downcast_truncates_to_low_byte() {
        let layout = layout(SampleWidth::U16, true, Interleave::Bil);
        let mut payload = vec![0u8; layout.payload_len() as usize];
        payload[0] = 0x34;
        payload[1] = 0x12;
        payload[2] = 0xff;
        payload[3] = 0xff;
        let cube = decode(&buffer_with_header(0, &payload), &layout).unwrap();

        assert!(matches!(cube, Cube::U8(_)));
        assert_eq!(cube.get(0, 0, 0), Some(0x34));
        assert_eq!(cube.get(0, 1, 0), Some(0xff));
    }

    #[test]
    fn header_bytes_do_not_affect_cube() {
        let layout = layout(SampleWidth::U16, false, Interleave::Bil);
        let payload: Vec<u8> = (0..layout.payload_len()).map(|i| (i * 7) as u8).collect();
        let a = decode(&buffer_with_header(0x00, &payload), &layout).unwrap();
        let b = decode(&buffer_with_header(0xff, &payload), &layout).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn short_buffer_is_fatal() {
        let layout = layout(SampleWidth::U16, false, Interleave::Bil);
        let buffer = vec![0u8; layout.payload_len() as usize - 1];
        let err = decode(&buffer, &layout).unwrap_err();
        assert!(matches!(err, DecodeError::BufferTooShort { .. }));
    }

    #[test]
    fn oversized_layout_is_too_short_not_a_panic() {
        let mut layout = layout(SampleWidth::U16, false, Interleave::Bil);
        layout.width = u32::MAX;
        layout.height = u32::MAX;
        layout.depth = u32::MAX;
        let err = decode(&[0u8; 16], &layout).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::BufferTooShort {
                needed: u64::MAX,
                actual: 16
            }
        ));
    }
}
