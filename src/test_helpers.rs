//! Shared test fixtures.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let original = tmp.path().join("uploads/photo.jpg");
//! create_test_jpeg(&original, 1600, 900);
//!
//! let catalog = sample_catalog();
//! ```

use crate::types::SizeSpec;
use image::{ImageEncoder, RgbImage};
use std::path::Path;

/// Write a gradient JPEG of the given size, creating parent directories.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// The stock catalog: `thumbnail` (150x150, crop), `medium` (300x300),
/// `medium_large` (768 wide) and `large` (1024x1024).
pub fn sample_catalog() -> Vec<SizeSpec> {
    vec![
        SizeSpec::new("thumbnail", 150, 150, true),
        SizeSpec::new("medium", 300, 300, false),
        SizeSpec::new("medium_large", 768, 0, false),
        SizeSpec::new("large", 1024, 1024, false),
    ]
}
