//! Batch coordination: one crop request, many sizes.
//!
//! [`Batch::run`] checks that the original exists and can be identified,
//! picks the sizes the request targets and renders them in parallel on the
//! rayon pool. Each size runs the full pipeline independently:
//!
//! ```text
//! derive_dimensions → derive_transparency / border_fill → derive_paths
//!     → ResizeHooks::job → resize_thumbnail
//! ```
//!
//! A failing size never stops its siblings; its error message is recorded
//! under its name in [`BatchResult::errors`]. Only a missing or unreadable
//! original fails the whole batch.

use crate::config::BatchConfig;
use crate::hooks::{NoHooks, ResizeHooks};
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, Quality, border_fill, derive_dimensions,
    derive_transparency,
};
use crate::naming::{PathRequest, derive_paths};
use crate::store::{MediaStore, SourceImage};
use crate::thumbnail::{ResizeError, ResizeJob, resize_thumbnail_keeping};
use crate::types::{BatchResult, CropRequest, ImageId, SizeSelector, SizeSpec, ThumbnailRecord};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a whole batch.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("No original image file found for image {0}")]
    ImageNotFound(ImageId),
    #[error("Unable to read original image {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

pub struct Batch<'a, B, S: ?Sized> {
    backend: &'a B,
    store: &'a S,
    catalog: &'a [SizeSpec],
    config: &'a BatchConfig,
    quality: Quality,
    hooks: &'a dyn ResizeHooks,
}

impl<'a, B, S> Batch<'a, B, S>
where
    B: ImageBackend,
    S: MediaStore + ?Sized,
{
    pub fn new(backend: &'a B, store: &'a S, catalog: &'a [SizeSpec], config: &'a BatchConfig) -> Self {
        Self {
            backend,
            store,
            catalog,
            config,
            quality: Quality::default(),
            hooks: &NoHooks,
        }
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn hooks(mut self, hooks: &'a dyn ResizeHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Catalog sizes a selector targets, in catalog order.
    ///
    /// Hidden sizes are removed first, so they are never rendered even when
    /// named explicitly.
    pub fn sizes(&self, selector: &SizeSelector) -> Vec<&'a SizeSpec> {
        self.catalog
            .iter()
            .filter(|size| !self.config.is_hidden(&size.name))
            .filter(|size| selector.matches(&size.name))
            .collect()
    }

    pub fn run(&self, request: &CropRequest) -> Result<BatchResult, BatchError> {
        let source = self
            .store
            .source(request.image_id)
            .ok_or(BatchError::ImageNotFound(request.image_id))?;
        let original = self
            .backend
            .identify(&source.file)
            .map_err(|e| BatchError::SourceUnreadable {
                path: source.file.clone(),
                source: e,
            })?;

        let sizes = self.sizes(&request.sizes);
        let timestamp = self
            .config
            .cache_buster
            .then(|| chrono::Utc::now().timestamp());

        info!(
            image_id = request.image_id,
            width = original.width,
            height = original.height,
            sizes = sizes.len(),
            save = request.save,
            "resizing"
        );

        let jobs: Vec<_> = sizes
            .into_iter()
            .map(|size| (size, self.prepare(size, request, &source, timestamp)))
            .collect();
        // Files this batch writes are never removed as superseded
        let written: HashSet<PathBuf> = jobs
            .iter()
            .filter_map(|(_, job)| job.as_ref().ok())
            .map(|job| job.paths.file.clone())
            .collect();

        // Collect first, merge after the join
        let outcomes: Vec<_> = jobs
            .into_par_iter()
            .map(|(size, job)| (size, job.and_then(|job| self.render(&job, &written))))
            .collect();

        let mut result = BatchResult::default();
        for (size, outcome) in outcomes {
            match outcome {
                Ok(record) => result.thumbnails.push(record),
                Err(e) => {
                    warn!(image_id = request.image_id, size = %size.name, error = %e, "size failed");
                    result.errors.insert(size.name.clone(), e.to_string());
                }
            }
        }
        Ok(result)
    }

    fn render(
        &self,
        job: &ResizeJob,
        written: &HashSet<PathBuf>,
    ) -> Result<ThumbnailRecord, ResizeError> {
        debug!(size = %job.size, width = job.dst.width, height = job.dst.height, "rendering");
        resize_thumbnail_keeping(self.backend, self.store, job, self.quality, self.hooks, written)
    }

    fn prepare(
        &self,
        size: &SizeSpec,
        request: &CropRequest,
        source: &SourceImage,
        timestamp: Option<i64>,
    ) -> Result<ResizeJob, ResizeError> {
        let rect = request.rect;
        let dst = derive_dimensions(size, rect.width, rect.height)?;

        let selection = Dimensions {
            width: rect.width,
            height: rect.height,
        };
        let border_color = request.border_color.as_deref();
        let transparent = derive_transparency(selection, dst, border_color);

        let path_request = PathRequest {
            image_id: request.image_id,
            original_file: &source.file,
            original_url: &source.url,
            width: dst.width,
            height: dst.height,
            transparent,
            save: request.save,
            timestamp,
        };
        let paths = derive_paths(&path_request, self.config, self.hooks);

        Ok(self.hooks.job(ResizeJob {
            image_id: request.image_id,
            size: size.name.clone(),
            source: source.file.clone(),
            rect,
            dst,
            border: border_fill(selection, dst, border_color),
            transparent,
            paths,
            save: request.save,
        }))
    }
}
