//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Crop + resize** | `crop_imm` + `resize_exact` (Lanczos3) |
//! | **Crop border** | letterbox onto a filled canvas |
//! | **Encode** | JPEG (quality), PNG, WebP, TIFF, GIF |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Transparency**: Crop-border and alpha-channel decisions
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;
pub mod transparency;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{DerivationError, calculate_fit_dimensions, derive_dimensions};
pub use params::{CropParams, Quality};
pub use rust_backend::RustBackend;
pub use transparency::{
    BorderFill, border_fill, derive_transparency, is_crop_border_enabled, is_crop_border_opaque,
};
