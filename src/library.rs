//! JSON-file media library.
//!
//! The library file lists every original the tool may edit and the
//! derivative currently stored for each of its sizes:
//!
//! ```json
//! {
//!   "version": 1,
//!   "images": {
//!     "42": {
//!       "file": "uploads/2024/05/photo.jpg",
//!       "url": "https://example.com/uploads/2024/05/photo.jpg",
//!       "sizes": {
//!         "thumbnail": { "file": "photo-150x150.jpg", "width": 150, "height": 150 }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Relative `file` paths are resolved against the library file's directory.
//! Stored size files are basenames living next to the original.
//!
//! Persisting a derivative rewrites the whole file. Access is serialized
//! through a mutex so sizes finishing on different rayon workers cannot
//! interleave writes.

use crate::store::{MediaStore, SourceImage, StoreError};
use crate::types::{ImageId, ThumbnailRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Version of the library file format.
const LIBRARY_VERSION: u32 = 1;

/// A derivative recorded for one size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSize {
    pub file: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    pub file: PathBuf,
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sizes: BTreeMap<String, StoredSize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryManifest {
    pub version: u32,
    pub images: BTreeMap<ImageId, StoredImage>,
}

impl Default for LibraryManifest {
    fn default() -> Self {
        Self {
            version: LIBRARY_VERSION,
            images: BTreeMap::new(),
        }
    }
}

/// A [`MediaStore`] persisted as a single JSON file.
#[derive(Debug)]
pub struct Library {
    path: PathBuf,
    manifest: Mutex<LibraryManifest>,
}

impl Library {
    /// A new, empty library that will be written to `path`.
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            manifest: Mutex::new(LibraryManifest::default()),
        }
    }

    /// Load the library file at `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let manifest: LibraryManifest = serde_json::from_str(&content)?;
        if manifest.version != LIBRARY_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: manifest.version,
                expected: LIBRARY_VERSION,
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            manifest: Mutex::new(manifest),
        })
    }

    /// Write the library back to its file.
    pub fn save(&self) -> Result<(), StoreError> {
        write_manifest(&self.path, &self.lock())
    }

    /// Register an original image.
    pub fn insert(&self, id: ImageId, file: impl Into<PathBuf>, url: impl Into<String>) {
        self.lock().images.insert(
            id,
            StoredImage {
                file: file.into(),
                url: url.into(),
                sizes: BTreeMap::new(),
            },
        );
    }

    pub fn image(&self, id: ImageId) -> Option<StoredImage> {
        self.lock().images.get(&id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, LibraryManifest> {
        self.manifest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            return file.to_path_buf();
        }
        match self.path.parent() {
            Some(dir) => dir.join(file),
            None => file.to_path_buf(),
        }
    }
}

fn write_manifest(path: &Path, manifest: &LibraryManifest) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(path, json)?;
    Ok(())
}

impl MediaStore for Library {
    fn source(&self, id: ImageId) -> Option<SourceImage> {
        let image = self.image(id)?;
        Some(SourceImage {
            file: self.resolve(&image.file),
            url: image.url,
        })
    }

    fn current_file(&self, id: ImageId, size: &str) -> Option<String> {
        self.lock()
            .images
            .get(&id)?
            .sizes
            .get(size)
            .map(|s| s.file.clone())
    }

    fn references(&self, id: ImageId, file: &str) -> bool {
        self.lock()
            .images
            .get(&id)
            .is_some_and(|image| image.sizes.values().any(|s| s.file == file))
    }

    /// The file is written before memory is updated, so a failed write
    /// leaves the library as it was.
    fn persist(&self, record: &ThumbnailRecord) -> Result<(), StoreError> {
        let mut manifest = self.lock();
        let mut updated = manifest.clone();
        let image = updated
            .images
            .get_mut(&record.image_id)
            .ok_or(StoreError::UnknownImage(record.image_id))?;
        image.sizes.insert(
            record.size.clone(),
            StoredSize {
                file: record.file.clone(),
                width: record.width,
                height: record.height,
            },
        );
        write_manifest(&self.path, &updated)?;
        *manifest = updated;
        Ok(())
    }
}
