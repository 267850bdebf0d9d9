//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the pipeline (which decides which derivative to render)
//! and the [`backend`](super::backend) (which does the pixel work), so the
//! backend can be swapped for a mock in tests.
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`CropParams`]: Source selection, destination box and optional border fill.

use super::transparency::BorderFill;
use crate::types::CropRect;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Parameters for a crop operation.
///
/// The `rect` region of the source is scaled to exactly
/// `dst_width` x `dst_height`. With a `border`, the region keeps its aspect
/// ratio and is centred inside the destination box instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropParams {
    pub rect: CropRect,
    pub dst_width: u32,
    pub dst_height: u32,
    pub border: Option<BorderFill>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_90() {
        assert_eq!(Quality::default().value(), 90);
    }
}
