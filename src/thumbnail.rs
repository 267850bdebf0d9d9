//! Rendering a single derivative.
//!
//! [`resize_thumbnail`] takes one fully derived [`ResizeJob`] through the
//! backend: load the original, crop and scale the selection, make sure the
//! target directory exists, encode. Saved jobs are then handed to the
//! [`MediaStore`] and the file they replace is removed.
//!
//! Any failure up to and including the write is returned as a
//! [`ResizeError`]. Removing the superseded file is best-effort: a failure
//! is logged and the derivative still counts as rendered.

use crate::hooks::ResizeHooks;
use crate::imaging::{
    BackendError, BorderFill, CropParams, DerivationError, Dimensions, ImageBackend, Quality,
};
use crate::naming::PathSet;
use crate::store::{MediaStore, StoreError};
use crate::types::{CropRect, ImageId, ThumbnailRecord};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error(transparent)]
    Derivation(#[from] DerivationError),
    #[error("Unable to load file: {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Error cropping image: {size}: {source}")]
    Crop {
        size: String,
        #[source]
        source: BackendError,
    },
    #[error("Unable to create directory: {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error writing image: {size} to {path}: {source}")]
    Write {
        size: String,
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Error saving {size}: {source}")]
    Store {
        size: String,
        #[source]
        source: StoreError,
    },
}

/// Everything needed to render one size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeJob {
    pub image_id: ImageId,
    pub size: String,
    /// The original image.
    pub source: PathBuf,
    pub rect: CropRect,
    pub dst: Dimensions,
    pub border: Option<BorderFill>,
    /// Whether the derivative carries an alpha channel. Already reflected
    /// in `paths`; kept for [`ResizeHooks::job`] implementations.
    pub transparent: bool,
    pub paths: PathSet,
    pub save: bool,
}

/// Render `job` and, for saved jobs, persist it and drop the stale file.
pub fn resize_thumbnail<B, S>(
    backend: &B,
    store: &S,
    job: &ResizeJob,
    quality: Quality,
    hooks: &dyn ResizeHooks,
) -> Result<ThumbnailRecord, ResizeError>
where
    B: ImageBackend,
    S: MediaStore + ?Sized,
{
    resize_thumbnail_keeping(backend, store, job, quality, hooks, &HashSet::new())
}

/// [`resize_thumbnail`] that never removes a file listed in `keep`.
///
/// A batch passes every path it writes, so sizes that share a file name
/// cannot delete each other's fresh output.
pub fn resize_thumbnail_keeping<B, S>(
    backend: &B,
    store: &S,
    job: &ResizeJob,
    quality: Quality,
    hooks: &dyn ResizeHooks,
    keep: &HashSet<PathBuf>,
) -> Result<ThumbnailRecord, ResizeError>
where
    B: ImageBackend,
    S: MediaStore + ?Sized,
{
    let raster = backend.load(&job.source).map_err(|source| ResizeError::Load {
        path: job.source.clone(),
        source,
    })?;

    let cropped = backend
        .crop(
            &raster,
            &CropParams {
                rect: job.rect,
                dst_width: job.dst.width,
                dst_height: job.dst.height,
                border: job.border,
            },
        )
        .map_err(|source| ResizeError::Crop {
            size: job.size.clone(),
            source,
        })?;

    if let Some(dir) = job.paths.file.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ResizeError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    backend
        .save(&cropped, &job.paths.file, quality)
        .map_err(|source| ResizeError::Write {
            size: job.size.clone(),
            path: job.paths.file.clone(),
            source,
        })?;

    let actual = backend.dimensions(&cropped);
    let record = ThumbnailRecord {
        image_id: job.image_id,
        size: job.size.clone(),
        width: actual.width,
        height: actual.height,
        file: job.paths.basename.clone(),
        path: job.paths.file.clone(),
        url: job.paths.url.clone(),
    };
    debug!(size = %record.size, path = %record.path.display(), "rendered");

    if job.save {
        let stale = store.current_file(job.image_id, &job.size);

        store.persist(&record).map_err(|source| ResizeError::Store {
            size: job.size.clone(),
            source,
        })?;

        if let Some(file) = stale {
            if store.references(job.image_id, &file) {
                debug!(file = %file, "superseded file still in use");
            } else {
                let path = hooks.stale_file(sibling(&job.source, &file));
                remove_stale(store, path, &record.path, keep);
            }
        }
    }

    Ok(record)
}

/// `file` in the same directory as `original`.
fn sibling(original: &Path, file: &str) -> PathBuf {
    match original.parent() {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

fn remove_stale<S: MediaStore + ?Sized>(
    store: &S,
    stale: PathBuf,
    written: &Path,
    keep: &HashSet<PathBuf>,
) {
    if stale == written || keep.contains(&stale) {
        return;
    }
    match store.delete(&stale) {
        Ok(()) => debug!(path = %stale.display(), "removed superseded file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %stale.display(), "superseded file already gone")
        }
        Err(e) => warn!(path = %stale.display(), error = %e, "could not remove superseded file"),
    }
}
