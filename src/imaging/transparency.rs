//! Crop-border and transparency decisions.
//!
//! A border is drawn when the user picked a border colour and the selection
//! does not have the destination's aspect ratio. Whether the derivative must
//! carry an alpha channel (and therefore be written as PNG) is
//! `border enabled && border colour is a #rrggbb hex value`.

use super::backend::Dimensions;
use regex::Regex;
use std::sync::LazyLock;

/// Aspect ratios closer than this are considered equal.
const ASPECT_TOLERANCE: f64 = 0.01;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[a-fA-F0-9]{6}$").expect("hex colour pattern is valid"));

/// How the raster engine fills the area around a letterboxed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderFill {
    Color([u8; 3]),
    Transparent,
}

fn aspect(dims: Dimensions) -> f64 {
    dims.width as f64 / dims.height as f64
}

/// True when a border colour was supplied and the aspect ratios differ.
pub fn is_crop_border_enabled(src: Dimensions, dst: Dimensions, border_color: Option<&str>) -> bool {
    border_color.is_some() && (aspect(src) - aspect(dst)).abs() > ASPECT_TOLERANCE
}

/// True only for a strict `#rrggbb` colour.
pub fn is_crop_border_opaque(border_color: Option<&str>) -> bool {
    border_color.is_some_and(|c| HEX_COLOR.is_match(c))
}

/// Whether the derivative needs an alpha channel.
pub fn derive_transparency(src: Dimensions, dst: Dimensions, border_color: Option<&str>) -> bool {
    is_crop_border_enabled(src, dst, border_color) && is_crop_border_opaque(border_color)
}

/// The border the raster engine should draw, if any.
pub fn border_fill(src: Dimensions, dst: Dimensions, border_color: Option<&str>) -> Option<BorderFill> {
    if !is_crop_border_enabled(src, dst, border_color) {
        return None;
    }
    Some(border_color.and_then(parse_hex).map_or(BorderFill::Transparent, BorderFill::Color))
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    if !HEX_COLOR.is_match(color) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&color[i..i + 2], 16).ok();
    Some([channel(1)?, channel(3)?, channel(5)?])
}
