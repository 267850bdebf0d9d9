//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use crate::types::SizeSpec;
use thiserror::Error;

/// Targets above this are treated as "no limit" on that axis.
const UNBOUNDED_ABOVE: u32 = 9998;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    #[error("Invalid derived dimensions: {width} x {height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid selection: {width} x {height}")]
    EmptySelection { width: u32, height: u32 },
}

fn is_unbounded(target: u32) -> bool {
    target == 0 || target > UNBOUNDED_ABOVE
}

/// Scale `target` along the driving axis onto the other axis.
///
/// Evaluated as `round(target / driving * other)` in `f64`; `f64::round`
/// rounds halves away from zero.
fn scale(target: u32, driving: u32, other: u32) -> u32 {
    (target as f64 / driving as f64 * other as f64).round() as u32
}

/// Derive the destination size for `size` from a `w` x `h` selection.
///
/// Fixed-crop sizes are returned verbatim. Proportional sizes are driven by
/// the longer side of the selection, unless that would scale against an
/// unbounded target, in which case the other side drives.
///
/// # Examples
/// ```
/// # use thumbcrop::imaging::{Dimensions, derive_dimensions};
/// # use thumbcrop::types::SizeSpec;
/// let medium = SizeSpec::new("medium", 300, 0, false);
/// let dims = derive_dimensions(&medium, 1600, 900).unwrap();
/// assert_eq!(dims, Dimensions { width: 300, height: 169 });
/// ```
pub fn derive_dimensions(size: &SizeSpec, w: u32, h: u32) -> Result<Dimensions, DerivationError> {
    let (width, height) = if size.crop {
        (size.width, size.height)
    } else {
        if w == 0 || h == 0 {
            return Err(DerivationError::EmptySelection {
                width: w,
                height: h,
            });
        }

        let mut use_width = w > h;
        if !use_width && is_unbounded(size.height) {
            use_width = true;
        } else if use_width && is_unbounded(size.width) {
            use_width = false;
        }

        if use_width {
            (size.width, scale(size.width, w, h))
        } else {
            (scale(size.height, h, w), size.height)
        }
    };

    if width == 0 || height == 0 {
        return Err(DerivationError::InvalidDimensions { width, height });
    }
    Ok(Dimensions { width, height })
}

/// Largest box with the source aspect ratio that fits inside `target`.
///
/// Used to letterbox a selection when a crop border is drawn. Never returns
/// a zero dimension.
pub fn calculate_fit_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: width matches, height shrinks
        let h = (tgt_w as f64 / src_aspect).round() as u32;
        (tgt_w, h.clamp(1, tgt_h))
    } else {
        // Source is taller: height matches, width shrinks
        let w = (tgt_h as f64 * src_aspect).round() as u32;
        (w.clamp(1, tgt_w), tgt_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    // =========================================================================
    // derive_dimensions: fixed crop
    // =========================================================================

    #[test]
    fn crop_size_ignores_selection() {
        let thumb = SizeSpec::new("thumbnail", 150, 150, true);
        for (w, h) in [(1600, 900), (900, 1600), (10, 10), (0, 0)] {
            assert_eq!(derive_dimensions(&thumb, w, h).unwrap(), dims(150, 150));
        }
    }

    #[test]
    fn crop_size_with_zero_axis_fails() {
        let broken = SizeSpec::new("broken", 150, 0, true);
        assert_eq!(
            derive_dimensions(&broken, 800, 600),
            Err(DerivationError::InvalidDimensions {
                width: 150,
                height: 0
            })
        );
    }

    // =========================================================================
    // derive_dimensions: proportional
    // =========================================================================

    #[test]
    fn landscape_unbounded_height_drives_width() {
        let medium = SizeSpec::new("medium", 300, 0, false);
        assert_eq!(derive_dimensions(&medium, 1600, 900).unwrap(), dims(300, 169));
    }

    #[test]
    fn landscape_bounded_drives_width() {
        let medium = SizeSpec::new("medium", 300, 300, false);
        // 300 / 1600 * 900 = 168.75
        assert_eq!(derive_dimensions(&medium, 1600, 900).unwrap(), dims(300, 169));
    }

    #[test]
    fn portrait_drives_height() {
        let medium = SizeSpec::new("medium", 300, 300, false);
        // 300 / 1600 * 900 = 168.75 on the other axis
        assert_eq!(derive_dimensions(&medium, 900, 1600).unwrap(), dims(169, 300));
    }

    #[test]
    fn portrait_with_unbounded_height_switches_to_width() {
        let wide = SizeSpec::new("medium_large", 768, 0, false);
        // 768 / 600 * 800 = 1024
        assert_eq!(derive_dimensions(&wide, 600, 800).unwrap(), dims(768, 1024));
    }

    #[test]
    fn landscape_with_unbounded_width_switches_to_height() {
        let tall = SizeSpec::new("tall", 99999, 400, false);
        // 400 / 600 * 800 = 533.33
        assert_eq!(derive_dimensions(&tall, 800, 600).unwrap(), dims(533, 400));
    }

    #[test]
    fn square_selection_drives_height() {
        let medium = SizeSpec::new("medium", 300, 200, false);
        assert_eq!(derive_dimensions(&medium, 500, 500).unwrap(), dims(200, 200));
    }

    #[test]
    fn rounds_half_up() {
        // 100 / 200 * 101 = 50.5 → 51
        let size = SizeSpec::new("s", 100, 0, false);
        assert_eq!(derive_dimensions(&size, 200, 101).unwrap(), dims(100, 51));
    }

    #[test]
    fn degenerate_selection_yields_zero_and_fails() {
        // 300 / 1600 * 1 = 0.19 → 0
        let medium = SizeSpec::new("medium", 300, 0, false);
        assert_eq!(
            derive_dimensions(&medium, 1600, 1),
            Err(DerivationError::InvalidDimensions {
                width: 300,
                height: 0
            })
        );
    }

    #[test]
    fn both_axes_unbounded_fails() {
        let size = SizeSpec::new("none", 0, 0, false);
        assert!(derive_dimensions(&size, 800, 600).is_err());
    }

    #[test]
    fn empty_selection_fails() {
        let medium = SizeSpec::new("medium", 300, 300, false);
        assert_eq!(
            derive_dimensions(&medium, 0, 600),
            Err(DerivationError::EmptySelection {
                width: 0,
                height: 600
            })
        );
    }

    // =========================================================================
    // calculate_fit_dimensions
    // =========================================================================

    #[test]
    fn fit_wide_source_into_square() {
        assert_eq!(calculate_fit_dimensions((1600, 900), (150, 150)), (150, 84));
    }

    #[test]
    fn fit_tall_source_into_square() {
        assert_eq!(calculate_fit_dimensions((900, 1600), (150, 150)), (84, 150));
    }

    #[test]
    fn fit_same_aspect() {
        assert_eq!(calculate_fit_dimensions((800, 600), (400, 300)), (400, 300));
    }

    #[test]
    fn fit_never_collapses_to_zero() {
        assert_eq!(calculate_fit_dimensions((10000, 1), (100, 100)), (100, 1));
    }
}
