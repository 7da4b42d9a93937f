//! Decoded hyperspectral cube.

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::formats::SampleWidth;

/// A dense cube indexed `[height][width][depth]`.
///
/// The element type follows the source layout: 8-bit layouts and the legacy
/// downcast layout produce `U8`, the remaining 16-bit layouts produce `U16`.
/// The array is a permuted view of the storage-order data, so its memory
/// strides are not necessarily row-major; indexing and iteration are always
/// in logical (height, width, depth) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cube {
    U8(Array3<u8>),
    U16(Array3<u16>),
}

impl Cube {
    /// (height, width, depth).
    pub fn shape(&self) -> (usize, usize, usize) {
        match self {
            Cube::U8(data) => data.dim(),
            Cube::U16(data) => data.dim(),
        }
    }

    pub fn height(&self) -> usize {
        self.shape().0
    }

    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// Number of spectral bands.
    pub fn depth(&self) -> usize {
        self.shape().2
    }

    pub fn len(&self) -> usize {
        match self {
            Cube::U8(data) => data.len(),
            Cube::U16(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_width(&self) -> SampleWidth {
        match self {
            Cube::U8(_) => SampleWidth::U8,
            Cube::U16(_) => SampleWidth::U16,
        }
    }

    /// Sample at (y, x, band), widened to `u16`.
    pub fn get(&self, y: usize, x: usize, band: usize) -> Option<u16> {
        match self {
            Cube::U8(data) => data.get([y, x, band]).map(|&v| u16::from(v)),
            Cube::U16(data) => data.get([y, x, band]).copied(),
        }
    }

    /// One band as an `f32` image of shape (height, width).
    ///
    /// Returns `None` when `index >= depth`.
    pub fn band_f32(&self, index: usize) -> Option<Array2<f32>> {
        if index >= self.depth() {
            return None;
        }
        let band = match self {
            Cube::U8(data) => widen(data.index_axis(Axis(2), index)),
            Cube::U16(data) => widen(data.index_axis(Axis(2), index)),
        };
        Some(band)
    }

    /// Smallest and largest sample, `None` for an empty cube.
    pub fn value_range(&self) -> Option<(u16, u16)> {
        match self {
            Cube::U8(data) => min_max(data.iter().map(|&v| u16::from(v))),
            Cube::U16(data) => min_max(data.iter().copied()),
        }
    }
}

fn widen<T: Copy + Into<f32>>(band: ArrayView2<'_, T>) -> Array2<f32> {
    band.mapv(|v| v.into())
}

fn min_max(values: impl Iterator<Item = u16>) -> Option<(u16, u16)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use ndarray::Array3;

    use super::Cube;
    use crate::formats::SampleWidth;

    fn sample_cube() -> Cube {
        // (height 2, width 3, depth 4), value = 100*y + 10*x + band
        Cube::U16(Array3::from_shape_fn((2, 3, 4), |(y, x, b)| {
            (100 * y + 10 * x + b) as u16
        }))
    }

    #[test]
    fn reports_shape_and_len() {
        let cube = sample_cube();
        assert_eq!(cube.shape(), (2, 3, 4));
        assert_eq!(cube.height(), 2);
        assert_eq!(cube.width(), 3);
        assert_eq!(cube.depth(), 4);
        assert_eq!(cube.len(), 24);
        assert!(!cube.is_empty());
        assert_eq!(cube.sample_width(), SampleWidth::U16);
    }

    #[test]
    fn band_extraction_selects_depth_axis() {
        let cube = sample_cube();
        let band = cube.band_f32(2).unwrap();
        assert_eq!(band.dim(), (2, 3));
        assert_eq!(band[[1, 2]], 122.0);
        assert!(cube.band_f32(4).is_none());
    }

    #[test]
    fn get_widens_u8() {
        let cube = Cube::U8(Array3::from_elem((1, 1, 1), 7));
        assert_eq!(cube.get(0, 0, 0), Some(7));
        assert_eq!(cube.get(0, 0, 1), None);
    }

    #[test]
    fn value_range_spans_all_samples() {
        assert_eq!(sample_cube().value_range(), Some((0, 123)));
        let empty = Cube::U8(Array3::zeros((0, 0, 0)));
        assert_eq!(empty.value_range(), None);
    }
}
