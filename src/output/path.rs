//! Destination paths for exported charts
//!
//! Exports land in a directory tree mirroring the Datawrapper folder
//! hierarchy below a base directory, or directly in the base directory when
//! flattening:
//!
//! ```text
//! {base}/{folder}/{subfolder}/{filename}.{format}   nested
//! {base}/{filename}.{format}                        flattened
//! ```
//!
//! # Usage Example
//!
//! ```rust
//! use datawrapper_export::output::ExportPathBuilder;
//! use datawrapper_export::ImageFormat;
//! use std::path::PathBuf;
//!
//! let builder = ExportPathBuilder::new(PathBuf::from("charts"));
//! let path = builder.file_path(&["Sub".to_string()], "12-GDP growth", ImageFormat::Svg);
//! assert_eq!(path, PathBuf::from("charts/Sub/12-GDP growth.svg"));
//! ```

use super::sanitize::sanitize;
use super::{OutputError, OutputResult};
use crate::ImageFormat;
use std::path::{Path, PathBuf};

/// Path builder for export destinations
#[derive(Debug, Clone)]
pub struct ExportPathBuilder {
    base_dir: PathBuf,
    flatten: bool,
}

impl ExportPathBuilder {
    /// Create a builder that mirrors folder hierarchy below `base_dir`
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            flatten: false,
        }
    }

    /// Write every file directly into the base directory
    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    /// Base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory for charts of the given folder path.
    ///
    /// Segments are sanitised again here; segments that sanitise to nothing
    /// are dropped rather than producing `//` or `..`.
    pub fn directory(&self, folder_path: &[String]) -> PathBuf {
        if self.flatten {
            return self.base_dir.clone();
        }

        folder_path
            .iter()
            .map(|segment| sanitize(segment))
            .filter(|segment| !segment.is_empty())
            .fold(self.base_dir.clone(), |dir, segment| dir.join(segment))
    }

    /// Full file path `{directory}/{filename}.{format}`
    pub fn file_path(&self, folder_path: &[String], filename: &str, format: ImageFormat) -> PathBuf {
        self.directory(folder_path)
            .join(format!("{}.{}", sanitize(filename), format))
    }

    /// Create the directory for the given folder path if missing
    pub fn ensure_directory(&self, folder_path: &[String]) -> OutputResult<PathBuf> {
        let dir = self.directory(folder_path);
        std::fs::create_dir_all(&dir).map_err(|e| {
            OutputError::IoError(format!(
                "Failed to create directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(dir)
    }
}
