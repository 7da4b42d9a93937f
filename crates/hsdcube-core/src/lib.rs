//! hsdcube core library for hyperspectral capture decoding.
//!
//! This crate turns raw `.hsd`/`.dat` camera captures into image cubes and
//! derives vegetation indices from them: the capture source reads the file,
//! the format registry picks the camera layout from the file size alone, and
//! the decoder (reader/parser) strips the header and reshapes the payload
//! into a (height, width, depth) cube. Decoding is byte-oriented and
//! side-effect free; all I/O is isolated in `source` and `dump`.
//!
//! Invariants:
//! - Layouts are resolved by exact total length only; no magic number or
//!   tolerance window is consulted.
//! - A decoded cube holds exactly width * height * depth samples.
//! - Dumping a cube and decoding it again with a header reproduces it exactly.
//! - The library never prints or logs; failures are returned as values.
//!
//! Version française (résumé):
//! Cette crate décode les captures hyperspectrales brutes : le registre
//! choisit la disposition d'après la taille exacte du fichier, le décodeur
//! retire l'en-tête et produit un cube (hauteur, largeur, bandes). Le calcul
//! NDVI et l'export brut complètent le cœur. Aucune E/S hors de `source` et
//! `dump`.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use hsdcube_core::{load_capture_file, ndvi};
//!
//! let capture = load_capture_file(Path::new("capture.hsd"))?;
//! let raster = ndvi(&capture.cube, 60, 30)?;
//! println!("{} x {} NDVI", raster.nrows(), raster.ncols());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

mod cube;
pub mod decode;
mod dump;
pub mod formats;
mod load;
pub mod ndvi;
mod source;

pub use cube::Cube;
pub use decode::{DecodeError, decode};
pub use dump::{DumpError, to_raw_bytes, write_ndvi_raw, write_raw_dump};
pub use formats::{
    CameraModel, FormatError, Interleave, LayoutSpec, SampleWidth, resolve, supported_layouts,
};
pub use load::{DecodedCapture, LoadError, decode_capture, load_capture, load_capture_file};
pub use ndvi::{NDVI_EPSILON, NdviError, NdviStats, band, ndvi};
pub use source::{CaptureFile, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Summary of one decoded capture.
///
/// # Examples
/// ```
/// use hsdcube_core::{CaptureReport, REPORT_VERSION};
///
/// let json = format!(
///     r#"{{"report_version":{REPORT_VERSION},
///        "tool":{{"name":"hsdcube","version":"0.1.0"}},
///        "input":{{"path":"a.hsd","bytes":14805000}},
///        "layout":{{"camera":"custom","total_file_size":14805000,"width":350,
///                   "height":300,"depth":141,"sample_width":"u8",
///                   "needs_8bit_downcast":false,"interleave":"bil",
///                   "header_bytes":0,"payload_bytes":14805000}},
///        "cube":{{"shape":[300,350,141],"sample_type":"u8","samples":14805000}}}}"#
/// );
/// let report: CaptureReport = serde_json::from_str(&json).unwrap();
/// assert_eq!(report.cube.shape, [300, 350, 141]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    pub layout: LayoutInfo,
    pub cube: CubeInfo,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided by the caller.
    pub path: String,
    pub bytes: u64,
    /// RFC3339 modification time, when the filesystem reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// Resolved layout of a capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub camera: CameraModel,
    pub total_file_size: u64,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Stored sample width (before any downcast).
    pub sample_width: SampleWidth,
    pub needs_8bit_downcast: bool,
    pub interleave: Interleave,
    pub header_bytes: u64,
    pub payload_bytes: u64,
}

impl LayoutInfo {
    pub fn new(layout: &LayoutSpec, header_bytes: u64) -> Self {
        Self {
            camera: layout.camera,
            total_file_size: layout.total_file_size,
            width: layout.width,
            height: layout.height,
            depth: layout.depth,
            sample_width: layout.sample_width,
            needs_8bit_downcast: layout.needs_8bit_downcast,
            interleave: layout.interleave,
            header_bytes,
            payload_bytes: layout.payload_len(),
        }
    }
}

/// Decoded cube metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeInfo {
    /// (height, width, depth).
    pub shape: [usize; 3],
    pub sample_type: SampleWidth,
    pub samples: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u16>,
}

impl CubeInfo {
    pub fn new(cube: &Cube) -> Self {
        let (height, width, depth) = cube.shape();
        let range = cube.value_range();
        Self {
            shape: [height, width, depth],
            sample_type: cube.sample_width(),
            samples: cube.len() as u64,
            min: range.map(|(lo, _)| lo),
            max: range.map(|(_, hi)| hi),
        }
    }
}

/// Build the report for a decoded capture.
pub fn make_capture_report(
    input_path: &str,
    capture: &DecodedCapture,
    modified: Option<SystemTime>,
) -> CaptureReport {
    CaptureReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "hsdcube".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: capture.layout.total_file_size,
            modified: modified.and_then(system_time_to_rfc3339),
        },
        layout: LayoutInfo::new(&capture.layout, capture.header_len),
        cube: CubeInfo::new(&capture.cube),
    }
}

fn system_time_to_rfc3339(ts: SystemTime) -> Option<String> {
    OffsetDateTime::from(ts).format(&Rfc3339).ok()
}
