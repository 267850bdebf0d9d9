//! CLI output formatting.
//!
//! Output is organised by size name, the identity users pick sizes by, with
//! paths and URLs as indented context lines.
//!
//! # Output Format
//!
//! ## Resize
//!
//! ```text
//! Image 42 (preview)
//!     thumbnail 150x150
//!         File: .thumbcrop-temp/photo-150x150.jpg
//!         URL: /thumbcrop-temp/photo-150x150.jpg
//!     medium: failed
//!         Error: Error cropping image: medium
//!
//! Rendered 1 size, 1 failed
//! ```
//!
//! ## Sizes
//!
//! ```text
//! 001 thumbnail 150x150 (crop)
//! 002 medium 300x300
//! 003 medium_large 768x* (hidden)
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::config::BatchConfig;
use crate::types::{BatchResult, ImageId, SizeSpec};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `*` for an unbounded axis.
fn axis(value: u32) -> String {
    if value == 0 || value > 9998 {
        "*".to_string()
    } else {
        value.to_string()
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

pub fn format_batch_result(image_id: ImageId, save: bool, result: &BatchResult) -> Vec<String> {
    let mut lines = Vec::new();
    let mode = if save { "saved" } else { "preview" };
    lines.push(format!("Image {image_id} ({mode})"));

    for thumb in &result.thumbnails {
        lines.push(format!(
            "{}{} {}x{}",
            indent(1),
            thumb.size,
            thumb.width,
            thumb.height
        ));
        lines.push(format!("{}File: {}", indent(2), thumb.path.display()));
        lines.push(format!("{}URL: {}", indent(2), thumb.url));
    }
    for (size, message) in &result.errors {
        lines.push(format!("{}{size}: failed", indent(1)));
        lines.push(format!("{}Error: {message}", indent(2)));
    }

    lines.push(String::new());
    let rendered = plural(result.thumbnails.len(), "size");
    if result.errors.is_empty() {
        lines.push(format!("Rendered {rendered}"));
    } else {
        lines.push(format!("Rendered {rendered}, {} failed", result.errors.len()));
    }
    lines
}

pub fn print_batch_result(image_id: ImageId, save: bool, result: &BatchResult) {
    for line in format_batch_result(image_id, save, result) {
        println!("{}", line);
    }
}

pub fn format_sizes(catalog: &[SizeSpec], config: &BatchConfig) -> Vec<String> {
    catalog
        .iter()
        .enumerate()
        .map(|(i, size)| {
            let mut line = format!(
                "{} {} {}x{}",
                format_index(i + 1),
                size.name,
                axis(size.width),
                axis(size.height)
            );
            if size.crop {
                line.push_str(" (crop)");
            }
            if config.is_hidden(&size.name) {
                line.push_str(" (hidden)");
            }
            line
        })
        .collect()
}

pub fn print_sizes(catalog: &[SizeSpec], config: &BatchConfig) {
    for line in format_sizes(catalog, config) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_catalog;
    use crate::types::ThumbnailRecord;
    use std::path::PathBuf;

    fn record(size: &str, width: u32, height: u32) -> ThumbnailRecord {
        let file = format!("photo-{width}x{height}.jpg");
        ThumbnailRecord {
            image_id: 42,
            size: size.to_string(),
            width,
            height,
            path: PathBuf::from("/tmp/crops").join(&file),
            url: format!("/crops/{file}"),
            file,
        }
    }

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(120), "120");
    }

    #[test]
    fn unbounded_axis_is_a_star() {
        assert_eq!(axis(0), "*");
        assert_eq!(axis(9999), "*");
        assert_eq!(axis(9998), "9998");
    }

    #[test]
    fn batch_result_lists_sizes_then_errors() {
        let mut result = BatchResult::default();
        result.thumbnails.push(record("thumbnail", 150, 150));
        result
            .errors
            .insert("medium".into(), "Error cropping image: medium".into());

        let lines = format_batch_result(42, false, &result);
        assert_eq!(
            lines,
            vec![
                "Image 42 (preview)",
                "    thumbnail 150x150",
                "        File: /tmp/crops/photo-150x150.jpg",
                "        URL: /crops/photo-150x150.jpg",
                "    medium: failed",
                "        Error: Error cropping image: medium",
                "",
                "Rendered 1 size, 1 failed",
            ]
        );
    }

    #[test]
    fn batch_result_summary_without_errors() {
        let result = BatchResult {
            thumbnails: vec![record("thumbnail", 150, 150), record("medium", 300, 169)],
            ..BatchResult::default()
        };
        let lines = format_batch_result(42, true, &result);
        assert_eq!(lines[0], "Image 42 (saved)");
        assert_eq!(lines.last().unwrap(), "Rendered 2 sizes");
    }

    #[test]
    fn empty_batch_result() {
        let lines = format_batch_result(7, false, &BatchResult::default());
        assert_eq!(lines, vec!["Image 7 (preview)", "", "Rendered 0 sizes"]);
    }

    #[test]
    fn sizes_mark_crop_and_hidden() {
        let config = BatchConfig {
            hidden_sizes: vec!["medium_large".into()],
            ..BatchConfig::default()
        };
        let lines = format_sizes(&sample_catalog(), &config);
        assert_eq!(
            lines,
            vec![
                "001 thumbnail 150x150 (crop)",
                "002 medium 300x300",
                "003 medium_large 768x* (hidden)",
                "004 large 1024x1024",
            ]
        );
    }
}
