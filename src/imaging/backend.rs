//! Raster editing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the raster-edit capability the pipeline
//! needs: identify a file, load it, crop a region into a destination box,
//! report a raster's size and encode it to disk.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{CropParams, Quality};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Width and height of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for raster editing backends.
///
/// `Sync` so one backend can serve every size of a batch from rayon's pool.
pub trait ImageBackend: Sync {
    /// Decoded image held between load, crop and save.
    type Raster: Send;

    /// Read image dimensions without a full decode where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the image at `path`.
    fn load(&self, path: &Path) -> Result<Self::Raster, BackendError>;

    /// Crop `params.rect` out of `raster` and scale it into the destination box.
    fn crop(&self, raster: &Self::Raster, params: &CropParams) -> Result<Self::Raster, BackendError>;

    fn dimensions(&self, raster: &Self::Raster) -> Dimensions;

    /// Encode `raster` to `path`; the format follows the file extension.
    fn save(&self, raster: &Self::Raster, path: &Path, quality: Quality) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::BorderFill;
    use crate::types::CropRect;
    use std::sync::Mutex;

    /// Mock backend that records operations without touching pixels.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        /// Dimensions reported for every source; `None` makes identify/load fail.
        pub source: Option<Dimensions>,
        /// Destination boxes whose crop fails.
        pub failing_crops: Vec<(u32, u32)>,
        /// Output paths containing one of these fragments fail to save.
        pub failing_saves: Vec<String>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MockRaster {
        pub width: u32,
        pub height: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Load(String),
        Crop {
            rect: CropRect,
            dst_width: u32,
            dst_height: u32,
            border: Option<BorderFill>,
        },
        Save {
            output: String,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_source(width: u32, height: u32) -> Self {
            Self {
                source: Some(Dimensions { width, height }),
                ..Self::default()
            }
        }

        pub fn failing_crop(mut self, width: u32, height: u32) -> Self {
            self.failing_crops.push((width, height));
            self
        }

        pub fn failing_save(mut self, fragment: &str) -> Self {
            self.failing_saves.push(fragment.to_string());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }
    }

    impl ImageBackend for MockBackend {
        type Raster = MockRaster;

        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.record(RecordedOp::Identify(path.to_string_lossy().to_string()));
            self.source
                .ok_or_else(|| BackendError::ProcessingFailed("No mock source".to_string()))
        }

        fn load(&self, path: &Path) -> Result<MockRaster, BackendError> {
            self.record(RecordedOp::Load(path.to_string_lossy().to_string()));
            self.source
                .map(|d| MockRaster {
                    width: d.width,
                    height: d.height,
                })
                .ok_or_else(|| BackendError::Decode {
                    path: path.display().to_string(),
                    message: "no mock source".to_string(),
                })
        }

        fn crop(&self, _raster: &MockRaster, params: &CropParams) -> Result<MockRaster, BackendError> {
            self.record(RecordedOp::Crop {
                rect: params.rect,
                dst_width: params.dst_width,
                dst_height: params.dst_height,
                border: params.border,
            });
            if self
                .failing_crops
                .contains(&(params.dst_width, params.dst_height))
            {
                return Err(BackendError::ProcessingFailed("mock crop failure".to_string()));
            }
            Ok(MockRaster {
                width: params.dst_width,
                height: params.dst_height,
            })
        }

        fn dimensions(&self, raster: &MockRaster) -> Dimensions {
            Dimensions {
                width: raster.width,
                height: raster.height,
            }
        }

        fn save(&self, _raster: &MockRaster, path: &Path, quality: Quality) -> Result<(), BackendError> {
            let output = path.to_string_lossy().to_string();
            self.record(RecordedOp::Save {
                output: output.clone(),
                quality: quality.value(),
            });
            if self.failing_saves.iter().any(|f| output.contains(f.as_str())) {
                return Err(BackendError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock write failure",
                )));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_source(800, 600);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result, Dimensions::from((800, 600)));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_without_source_fails_to_load() {
        let backend = MockBackend::new();
        assert!(backend.identify(Path::new("/a.jpg")).is_err());
        assert!(matches!(
            backend.load(Path::new("/a.jpg")),
            Err(BackendError::Decode { .. })
        ));
    }

    #[test]
    fn mock_crop_returns_destination_box() {
        let backend = MockBackend::with_source(1600, 900);
        let raster = backend.load(Path::new("/a.jpg")).unwrap();
        let cropped = backend
            .crop(
                &raster,
                &CropParams {
                    rect: CropRect {
                        x: 0,
                        y: 0,
                        width: 1600,
                        height: 900,
                    },
                    dst_width: 150,
                    dst_height: 150,
                    border: None,
                },
            )
            .unwrap();
        assert_eq!(backend.dimensions(&cropped), Dimensions::from((150, 150)));
    }
}
