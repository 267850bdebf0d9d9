//! Pure Rust raster backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image::ImageReader` |
//! | Crop | `DynamicImage::crop_imm` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Border | `imageops::overlay` onto a filled RGBA canvas |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with configured quality |
//! | Encode → PNG, WebP, TIFF, GIF | `DynamicImage::save_with_format` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{CropParams, Quality};
use super::transparency::BorderFill;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn image_error(context: &str, err: image::ImageError) -> BackendError {
    match err {
        image::ImageError::IoError(e) => BackendError::Io(e),
        other => BackendError::ProcessingFailed(format!("{context}: {other}")),
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| BackendError::Decode {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}

/// Scale `region` to fit inside the destination box and centre it on a
/// canvas painted with `fill`.
fn letterbox(region: &DynamicImage, dst_w: u32, dst_h: u32, fill: BorderFill) -> DynamicImage {
    let (fit_w, fit_h) = calculate_fit_dimensions((region.width(), region.height()), (dst_w, dst_h));
    let scaled = region.resize_exact(fit_w, fit_h, FilterType::Lanczos3).to_rgba8();

    let background = match fill {
        BorderFill::Color([r, g, b]) => Rgba([r, g, b, 255]),
        BorderFill::Transparent => Rgba([0, 0, 0, 0]),
    };
    let mut canvas = RgbaImage::from_pixel(dst_w, dst_h, background);
    let x = i64::from((dst_w - fit_w) / 2);
    let y = i64::from((dst_h - fit_h) / 2);
    image::imageops::overlay(&mut canvas, &scaled, x, y);
    DynamicImage::ImageRgba8(canvas)
}

/// Save a DynamicImage to the given path, inferring format from extension.
fn save_image(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => save_jpeg(img, path, quality),
        other => {
            let format = ImageFormat::from_extension(other)
                .filter(|f| f.writing_enabled())
                .ok_or_else(|| {
                    BackendError::ProcessingFailed(format!("Unsupported output format: {other}"))
                })?;
            img.save_with_format(path, format)
                .map_err(|e| image_error("Encode failed", e))
        }
    }
}

/// JPEG has no alpha channel; letterboxed rasters are flattened first.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.value() as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| image_error("JPEG encode failed", e))
}

impl ImageBackend for RustBackend {
    type Raster = DynamicImage;

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) =
            image::image_dimensions(path).map_err(|e| image_error("Failed to read dimensions", e))?;
        Ok(Dimensions { width, height })
    }

    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        load_image(path)
    }

    fn crop(&self, raster: &DynamicImage, params: &CropParams) -> Result<DynamicImage, BackendError> {
        let rect = params.rect;
        let fits = rect.x.checked_add(rect.width).is_some_and(|r| r <= raster.width())
            && rect.y.checked_add(rect.height).is_some_and(|b| b <= raster.height());
        if rect.width == 0 || rect.height == 0 || !fits {
            return Err(BackendError::ProcessingFailed(format!(
                "Crop {}x{}+{}+{} outside {}x{} image",
                rect.width,
                rect.height,
                rect.x,
                rect.y,
                raster.width(),
                raster.height()
            )));
        }
        if params.dst_width == 0 || params.dst_height == 0 {
            return Err(BackendError::ProcessingFailed(format!(
                "Invalid destination {}x{}",
                params.dst_width, params.dst_height
            )));
        }

        let region = raster.crop_imm(rect.x, rect.y, rect.width, rect.height);
        Ok(match params.border {
            Some(fill) => letterbox(&region, params.dst_width, params.dst_height, fill),
            None => region.resize_exact(params.dst_width, params.dst_height, FilterType::Lanczos3),
        })
    }

    fn dimensions(&self, raster: &DynamicImage) -> Dimensions {
        Dimensions {
            width: raster.width(),
            height: raster.height(),
        }
    }

    fn save(&self, raster: &DynamicImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
        save_image(raster, path, quality)
    }
}
