use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FormatError;

/// Spectral band count shared by every supported camera.
pub const BAND_COUNT: u32 = 141;

pub const HSC180X_FILE_SIZE: u64 = 370_623_040;
pub const HSC170X_LEGACY_FILE_SIZE: u64 = 87_630_400;
pub const HSC170X_FILE_SIZE: u64 = 44_315_200;
pub const HSC180X_CL_FILE_SIZE: u64 = 585_755_200;
pub const CUSTOM_FILE_SIZE: u64 = 14_805_000;

/// Camera family a capture layout belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraModel {
    Hsc180x,
    /// Older HSC170X firmware writing 16-bit samples that are narrowed to 8 bits.
    Hsc170xLegacy,
    Hsc170x,
    Hsc180xCl,
    Custom,
}

impl CameraModel {
    pub const ALL: [CameraModel; 5] = [
        CameraModel::Hsc180x,
        CameraModel::Hsc170xLegacy,
        CameraModel::Hsc170x,
        CameraModel::Hsc180xCl,
        CameraModel::Custom,
    ];

    /// Stable lowercase identifier used on the command line and in reports.
    pub fn slug(self) -> &'static str {
        match self {
            CameraModel::Hsc180x => "hsc180x",
            CameraModel::Hsc170xLegacy => "hsc170x-legacy",
            CameraModel::Hsc170x => "hsc170x",
            CameraModel::Hsc180xCl => "hsc180x-cl",
            CameraModel::Custom => "custom",
        }
    }

    pub fn layout(self) -> LayoutSpec {
        match self {
            CameraModel::Hsc180x => HSC180X,
            CameraModel::Hsc170xLegacy => HSC170X_LEGACY,
            CameraModel::Hsc170x => HSC170X,
            CameraModel::Hsc180xCl => HSC180X_CL,
            CameraModel::Custom => CUSTOM,
        }
    }
}

impl fmt::Display for CameraModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CameraModel {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CameraModel::ALL
            .into_iter()
            .find(|model| model.slug() == wanted)
            .ok_or(FormatError::UnknownCamera {
                name: s.to_string(),
            })
    }
}

/// Width of one stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleWidth {
    U8,
    U16,
}

impl SampleWidth {
    pub const fn bytes(self) -> u64 {
        match self {
            SampleWidth::U8 => 1,
            SampleWidth::U16 => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SampleWidth::U8 => "u8",
            SampleWidth::U16 => "u16",
        }
    }
}

/// Order in which samples are stored in the payload (width always varies fastest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interleave {
    /// Band interleaved by line: (height, depth, width).
    Bil,
    /// Band sequential: (depth, height, width).
    Bsq,
}

impl Interleave {
    /// Storage-order shape for a cube of the given dimensions.
    pub fn storage_shape(self, height: usize, width: usize, depth: usize) -> (usize, usize, usize) {
        match self {
            Interleave::Bil => (height, depth, width),
            Interleave::Bsq => (depth, height, width),
        }
    }

    /// Axis permutation taking a storage-order array to (height, width, depth).
    pub fn canonical_axes(self) -> [usize; 3] {
        match self {
            Interleave::Bil => [0, 2, 1],
            Interleave::Bsq => [1, 2, 0],
        }
    }

    /// Inverse of [`Interleave::canonical_axes`].
    pub fn storage_axes(self) -> [usize; 3] {
        match self {
            Interleave::Bil => [0, 2, 1],
            Interleave::Bsq => [2, 0, 1],
        }
    }
}

/// Fixed description of one capture layout.
///
/// `total_file_size` is the discriminant used by the registry; the header
/// length is never stored and is derived from the buffer length instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub camera: CameraModel,
    pub total_file_size: u64,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub sample_width: SampleWidth,
    pub needs_8bit_downcast: bool,
    pub interleave: Interleave,
}

impl LayoutSpec {
    /// Saturates at `u64::MAX` for dimensions no buffer can hold.
    pub const fn sample_count(&self) -> u64 {
        (self.width as u64)
            .saturating_mul(self.height as u64)
            .saturating_mul(self.depth as u64)
    }

    /// Payload size in bytes (everything after the header).
    pub const fn payload_len(&self) -> u64 {
        self.sample_count().saturating_mul(self.sample_width.bytes())
    }

    /// Header length for a buffer of `buffer_len` bytes, `None` when the
    /// buffer cannot hold the payload.
    pub const fn header_len_for(&self, buffer_len: u64) -> Option<u64> {
        buffer_len.checked_sub(self.payload_len())
    }

    /// Sample width of the decoded cube.
    pub const fn output_sample_width(&self) -> SampleWidth {
        if self.needs_8bit_downcast {
            SampleWidth::U8
        } else {
            self.sample_width
        }
    }

    /// Shape of the decoded cube as (height, width, depth).
    pub const fn canonical_shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.depth as usize,
        )
    }

    pub fn storage_shape(&self) -> (usize, usize, usize) {
        let (height, width, depth) = self.canonical_shape();
        self.interleave.storage_shape(height, width, depth)
    }
}

pub const HSC180X: LayoutSpec = LayoutSpec {
    camera: CameraModel::Hsc180x,
    total_file_size: HSC180X_FILE_SIZE,
    width: 1280,
    height: 1024,
    depth: BAND_COUNT,
    sample_width: SampleWidth::U16,
    needs_8bit_downcast: false,
    interleave: Interleave::Bil,
};

pub const HSC170X_LEGACY: LayoutSpec = LayoutSpec {
    camera: CameraModel::Hsc170xLegacy,
    total_file_size: HSC170X_LEGACY_FILE_SIZE,
    width: 640,
    height: 480,
    depth: BAND_COUNT,
    sample_width: SampleWidth::U16,
    needs_8bit_downcast: true,
    interleave: Interleave::Bil,
};

pub const HSC170X: LayoutSpec = LayoutSpec {
    camera: CameraModel::Hsc170x,
    total_file_size: HSC170X_FILE_SIZE,
    width: 640,
    height: 480,
    depth: BAND_COUNT,
    sample_width: SampleWidth::U8,
    needs_8bit_downcast: false,
    interleave: Interleave::Bil,
};

pub const HSC180X_CL: LayoutSpec = LayoutSpec {
    camera: CameraModel::Hsc180xCl,
    total_file_size: HSC180X_CL_FILE_SIZE,
    width: 1920,
    height: 1080,
    depth: BAND_COUNT,
    sample_width: SampleWidth::U16,
    needs_8bit_downcast: false,
    interleave: Interleave::Bil,
};

pub const CUSTOM: LayoutSpec = LayoutSpec {
    camera: CameraModel::Custom,
    total_file_size: CUSTOM_FILE_SIZE,
    width: 350,
    height: 300,
    depth: BAND_COUNT,
    sample_width: SampleWidth::U8,
    needs_8bit_downcast: false,
    interleave: Interleave::Bil,
};

pub const LAYOUTS: [LayoutSpec; 5] = [HSC180X, HSC170X_LEGACY, HSC170X, HSC180X_CL, CUSTOM];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layout_leaves_room_for_its_payload() {
        for layout in LAYOUTS {
            assert!(
                layout.header_len_for(layout.total_file_size).is_some(),
                "{} payload exceeds file size",
                layout.camera
            );
        }
    }

    #[test]
    fn header_lengths_match_camera_firmware() {
        assert_eq!(HSC180X.header_len_for(HSC180X_FILE_SIZE), Some(1_000_000));
        assert_eq!(
            HSC170X_LEGACY.header_len_for(HSC170X_LEGACY_FILE_SIZE),
            Some(1_000_000)
        );
        assert_eq!(HSC170X.header_len_for(HSC170X_FILE_SIZE), Some(1_000_000));
        assert_eq!(
            HSC180X_CL.header_len_for(HSC180X_CL_FILE_SIZE),
            Some(1_000_000)
        );
        assert_eq!(CUSTOM.header_len_for(CUSTOM_FILE_SIZE), Some(0));
    }

    #[test]
    fn payload_len_saturates_for_huge_dimensions() {
        let layout = LayoutSpec {
            width: u32::MAX,
            height: u32::MAX,
            depth: u32::MAX,
            ..HSC180X
        };
        assert_eq!(layout.sample_count(), u64::MAX);
        assert_eq!(layout.payload_len(), u64::MAX);
        assert_eq!(layout.header_len_for(HSC180X_FILE_SIZE), None);
    }

    #[test]
    fn header_len_is_none_for_short_buffer() {
        assert_eq!(CUSTOM.header_len_for(CUSTOM_FILE_SIZE - 1), None);
    }

    #[test]
    fn downcast_layout_decodes_to_u8() {
        assert_eq!(HSC170X_LEGACY.output_sample_width(), SampleWidth::U8);
        assert_eq!(HSC180X.output_sample_width(), SampleWidth::U16);
    }

    #[test]
    fn storage_and_canonical_axes_are_inverse() {
        for interleave in [Interleave::Bil, Interleave::Bsq] {
            let forward = interleave.canonical_axes();
            let back = interleave.storage_axes();
            for (axis, &source) in back.iter().enumerate() {
                assert_eq!(forward[source], axis, "{interleave:?}");
            }
        }
    }

    #[test]
    fn camera_slug_round_trips() {
        for model in CameraModel::ALL {
            assert_eq!(model.slug().parse::<CameraModel>().unwrap(), model);
            assert_eq!(model.layout().camera, model);
        }
        assert!("HSC180X-CL".parse::<CameraModel>().is_ok());
        assert!(matches!(
            "hsc999".parse::<CameraModel>(),
            Err(FormatError::UnknownCamera { .. })
        ));
    }
}
