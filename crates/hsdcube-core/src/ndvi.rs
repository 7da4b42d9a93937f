//! Normalized Difference Vegetation Index over two cube bands.
//!
//! `ndvi = (nir - red) / (nir + red + NDVI_EPSILON)`, computed per pixel in
//! `f32`. The epsilon keeps zero/zero pixels finite; the result is not
//! clamped, so degenerate pixels may sit marginally outside [-1, 1].

use ndarray::{Array2, Array3, Axis, Zip};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cube::Cube;

pub const NDVI_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NdviError {
    #[error("invalid band index {index}: cube has {depth} bands")]
    InvalidBandIndex { index: usize, depth: usize },
}

/// Compute the NDVI raster of shape (height, width).
///
/// # Examples
/// ```
/// use hsdcube_core::{Cube, ndvi};
/// use ndarray::Array3;
///
/// let mut data = Array3::<u8>::zeros((1, 1, 2));
/// data[[0, 0, 0]] = 100;
/// data[[0, 0, 1]] = 200;
/// let raster = ndvi(&Cube::U8(data), 1, 0).unwrap();
/// assert!((raster[[0, 0]] - 1.0 / 3.0).abs() < 1e-4);
/// ```
///
/// # Errors
/// Returns `NdviError::InvalidBandIndex` if either index is not below the
/// cube depth.
pub fn ndvi(cube: &Cube, nir_band: usize, red_band: usize) -> Result<Array2<f32>, NdviError> {
    check_band(cube, nir_band)?;
    check_band(cube, red_band)?;
    let raster = match cube {
        Cube::U8(data) => ndvi_typed(data, nir_band, red_band),
        Cube::U16(data) => ndvi_typed(data, nir_band, red_band),
    };
    Ok(raster)
}

/// Extract a single band as `f32`.
pub fn band(cube: &Cube, index: usize) -> Result<Array2<f32>, NdviError> {
    check_band(cube, index)?;
    cube.band_f32(index).ok_or(NdviError::InvalidBandIndex {
        index,
        depth: cube.depth(),
    })
}

fn check_band(cube: &Cube, index: usize) -> Result<(), NdviError> {
    let depth = cube.depth();
    if index >= depth {
        return Err(NdviError::InvalidBandIndex { index, depth });
    }
    Ok(())
}

fn ndvi_typed<T>(data: &Array3<T>, nir_band: usize, red_band: usize) -> Array2<f32>
where
    T: Copy + Into<f32>,
{
    let nir = data.index_axis(Axis(2), nir_band);
    let red = data.index_axis(Axis(2), red_band);
    Zip::from(&nir).and(&red).map_collect(|&n, &r| {
        let (n, r): (f32, f32) = (n.into(), r.into());
        (n - r) / (n + r + NDVI_EPSILON)
    })
}

/// Summary statistics over an NDVI raster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NdviStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
}

impl NdviStats {
    /// `None` for an empty raster.
    pub fn from_raster(raster: &Array2<f32>) -> Option<Self> {
        if raster.is_empty() {
            return None;
        }
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        for &value in raster {
            min = min.min(value);
            max = max.max(value);
            sum += f64::from(value);
        }
        Some(Self {
            min,
            max,
            mean: sum / raster.len() as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, Array3};

    use super::{NdviError, NdviStats, band, ndvi};
    use crate::cube::Cube;

    const NIR: usize = 1;
    const RED: usize = 0;

    fn two_by_two() -> Cube {
        let mut data = Array3::<u16>::zeros((2, 2, 3));
        data[[0, 0, NIR]] = 200;
        data[[0, 0, RED]] = 100;
        data[[0, 1, NIR]] = 0;
        data[[0, 1, RED]] = 0;
        data[[1, 0, NIR]] = 50;
        data[[1, 0, RED]] = 150;
        data[[1, 1, NIR]] = 65535;
        data[[1, 1, RED]] = 0;
        Cube::U16(data)
    }

    #[test]
    fn ndvi_matches_band_ratio() {
        let raster = ndvi(&two_by_two(), NIR, RED).unwrap();
        assert_eq!(raster.dim(), (2, 2));
        assert!((raster[[0, 0]] - 0.3333).abs() < 1e-4);
        assert!((raster[[1, 0]] + 0.5).abs() < 1e-4);
        assert!((raster[[1, 1]] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn zero_pixels_are_finite() {
        let raster = ndvi(&two_by_two(), NIR, RED).unwrap();
        let value = raster[[0, 1]];
        assert!(value.is_finite());
        assert_eq!(value, 0.0);
    }

    #[test]
    fn band_index_past_end_is_rejected() {
        let cube = two_by_two();
        assert_eq!(
            ndvi(&cube, 3, RED).unwrap_err(),
            NdviError::InvalidBandIndex { index: 3, depth: 3 }
        );
        assert_eq!(
            ndvi(&cube, NIR, 7).unwrap_err(),
            NdviError::InvalidBandIndex { index: 7, depth: 3 }
        );
    }

    #[test]
    fn u8_cube_uses_same_formula() {
        let mut data = Array3::<u8>::zeros((1, 1, 2));
        data[[0, 0, 0]] = 10;
        data[[0, 0, 1]] = 30;
        let raster = ndvi(&Cube::U8(data), 1, 0).unwrap();
        assert!((raster[[0, 0]] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn band_extracts_single_plane() {
        let plane = band(&two_by_two(), RED).unwrap();
        assert_eq!(plane[[1, 0]], 150.0);
        assert!(band(&two_by_two(), 3).is_err());
    }

    #[test]
    fn stats_cover_raster() {
        let raster = Array2::from_shape_vec((1, 3), vec![-0.5, 0.0, 1.0]).unwrap();
        let stats = NdviStats::from_raster(&raster).unwrap();
        assert_eq!(stats.min, -0.5);
        assert_eq!(stats.max, 1.0);
        assert!((stats.mean - 1.0 / 6.0).abs() < 1e-9);
        assert!(NdviStats::from_raster(&Array2::zeros((0, 0))).is_none());
    }
}
