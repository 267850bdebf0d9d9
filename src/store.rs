//! The media store the pipeline reads originals from and hands saved
//! derivatives to.
//!
//! [`Library`](crate::library::Library) is the JSON-backed implementation
//! used by the binary.

use crate::types::{ImageId, ThumbnailRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown image: {0}")]
    UnknownImage(ImageId),
    #[error("Unsupported library version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// An original image as the store knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Path of the original on disk.
    pub file: PathBuf,
    /// Public URL of the original.
    pub url: String,
}

pub trait MediaStore: Sync {
    fn source(&self, id: ImageId) -> Option<SourceImage>;

    /// Basename of the file currently stored for `size`, if any.
    fn current_file(&self, id: ImageId, size: &str) -> Option<String>;

    /// Whether any size of the image is currently stored as `file`.
    fn references(&self, id: ImageId, file: &str) -> bool;

    /// Record `record` as the image's derivative for its size.
    fn persist(&self, record: &ThumbnailRecord) -> Result<(), StoreError>;

    fn delete(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }
}
