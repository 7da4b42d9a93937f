use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::formats::{LayoutSpec, resolve};

use super::SourceError;

/// A capture file whose layout has been resolved from its size.
#[derive(Debug, Clone)]
pub struct CaptureFile {
    path: PathBuf,
    layout: LayoutSpec,
    modified: Option<SystemTime>,
}

impl CaptureFile {
    /// Stat `path` and resolve its layout without reading the payload.
    ///
    /// # Errors
    /// Returns `SourceError::Format` for an unsupported size and
    /// `SourceError::Io` when the file cannot be inspected.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let meta = fs::metadata(path)?;
        if !meta.is_file() {
            return Err(SourceError::NotAFile {
                path: path.display().to_string(),
            });
        }
        let layout = resolve(meta.len())?;
        Ok(Self {
            path: path.to_path_buf(),
            layout,
            modified: meta.modified().ok(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    pub fn len(&self) -> u64 {
        self.layout.total_file_size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Read the whole file in one shot.
    ///
    /// # Errors
    /// Returns `SourceError::SizeChanged` if the file no longer has the size
    /// its layout was resolved from.
    pub fn read(&self) -> Result<Vec<u8>, SourceError> {
        let bytes = fs::read(&self.path)?;
        let actual = bytes.len() as u64;
        if actual != self.len() {
            return Err(SourceError::SizeChanged {
                expected: self.len(),
                actual,
            });
        }
        Ok(bytes)
    }
}
