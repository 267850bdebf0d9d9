//! Shared types passed between the batch coordinator, the per-size
//! pipeline and the store.
//!
//! `ThumbnailRecord` and `BatchResult` are serialized as the JSON response
//! of the `resize` command and must stay stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Identifier of an image in the media library.
pub type ImageId = u64;

/// A named output size from the catalog.
///
/// A `width` or `height` of `0` (or anything above 9998) means the axis is
/// unbounded and is never used to drive proportional scaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizeSpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Fixed crop box (`true`) or aspect-preserving (`false`).
    #[serde(default)]
    pub crop: bool,
}

impl SizeSpec {
    pub fn new(name: &str, width: u32, height: u32, crop: bool) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            crop,
        }
    }
}

/// The user's selection on the source image, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Which catalog sizes a request targets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SizeSelector {
    #[default]
    All,
    One(String),
    Set(Vec<String>),
}

impl SizeSelector {
    /// An empty selector selects every size.
    pub fn is_empty(&self) -> bool {
        match self {
            SizeSelector::All => true,
            SizeSelector::One(name) => name.is_empty(),
            SizeSelector::Set(names) => names.is_empty(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        match self {
            SizeSelector::All => true,
            SizeSelector::One(wanted) => wanted == name,
            SizeSelector::Set(names) => names.iter().any(|n| n == name),
        }
    }
}

impl From<Vec<String>> for SizeSelector {
    fn from(mut names: Vec<String>) -> Self {
        match names.len() {
            0 => SizeSelector::All,
            1 => SizeSelector::One(names.remove(0)),
            _ => SizeSelector::Set(names),
        }
    }
}

/// One crop/resize operation requested by the user.
#[derive(Debug, Clone)]
pub struct CropRequest {
    pub image_id: ImageId,
    pub rect: CropRect,
    pub sizes: SizeSelector,
    /// Write next to the original and replace the stored size, instead of
    /// rendering a preview into the temporary directory.
    pub save: bool,
    /// Fit-crop border colour, when the user asked for a border.
    pub border_color: Option<String>,
}

/// A successfully rendered derivative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailRecord {
    pub image_id: ImageId,
    pub size: String,
    pub width: u32,
    pub height: u32,
    /// Basename of the written file.
    pub file: String,
    pub path: PathBuf,
    pub url: String,
}

/// Aggregate outcome of one request: rendered sizes plus per-size errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub thumbnails: Vec<ThumbnailRecord>,
    pub errors: BTreeMap<String, String>,
}

impl BatchResult {
    /// Look up the record for a size name.
    pub fn get(&self, size: &str) -> Option<&ThumbnailRecord> {
        self.thumbnails.iter().find(|t| t.size == size)
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}
