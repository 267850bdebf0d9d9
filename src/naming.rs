//! Output naming for derivatives.
//!
//! A derivative of `photo.jpg` rendered at 300x169 is called
//! `photo-300x169.jpg`. With the cache buster enabled a unix timestamp is
//! appended (`photo-300x169-1700000000.jpg`), and derivatives that need an
//! alpha channel are always `.png`.
//!
//! ## Locations
//!
//! | `save` | Directory | URL root |
//! |---|---|---|
//! | `true` | the original file's directory | the directory of the original's public URL |
//! | `false` | `batch.temp_dir` | `batch.temp_url` |
//!
//! Nothing here touches the filesystem; every output goes through the
//! [`ResizeHooks`] naming methods before it is returned.

use crate::config::BatchConfig;
use crate::hooks::ResizeHooks;
use crate::types::ImageId;
use std::path::{Path, PathBuf};

/// Everything that determines a derivative's name and location.
#[derive(Debug, Clone)]
pub struct PathRequest<'a> {
    pub image_id: ImageId,
    pub original_file: &'a Path,
    /// Public URL of the original file.
    pub original_url: &'a str,
    pub width: u32,
    pub height: u32,
    pub transparent: bool,
    pub save: bool,
    /// Cache-buster timestamp, when enabled.
    pub timestamp: Option<i64>,
}

/// Name, output path and public URL of one derivative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    pub basename: String,
    pub file: PathBuf,
    pub url: String,
}

/// Build `{name}-{w}x{h}[-{timestamp}].{ext}` for a request.
pub fn derive_basename(request: &PathRequest<'_>) -> String {
    let original = request.original_file;
    let ext = if request.transparent {
        "png".to_string()
    } else {
        original
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "png".to_string())
    };
    let name = original
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = format!("{}x{}", request.width, request.height);

    match request.timestamp {
        Some(ts) => format!("{name}-{suffix}-{ts}.{ext}"),
        None => format!("{name}-{suffix}.{ext}"),
    }
}

/// The directory part of a URL, with its trailing slash.
///
/// `https://cdn.example/uploads/photo.jpg` → `https://cdn.example/uploads/`
fn url_directory(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[..=idx],
        None => "",
    }
}

/// Append `basename` to a URL root with exactly one `/` between them.
fn join_url(root: &str, basename: &str) -> String {
    if root.is_empty() || root.ends_with('/') {
        format!("{root}{basename}")
    } else {
        format!("{root}/{basename}")
    }
}

/// Derive the basename, output path and URL of a derivative.
pub fn derive_paths(
    request: &PathRequest<'_>,
    config: &BatchConfig,
    hooks: &dyn ResizeHooks,
) -> PathSet {
    let basename = hooks.basename(derive_basename(request));

    let (directory, url_root) = if request.save {
        let dir = request
            .original_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        (dir, url_directory(request.original_url))
    } else {
        (config.temp_dir.clone(), config.temp_url.as_str())
    };
    let directory = hooks.directory(directory);

    let file = hooks.file(directory.join(&basename), request);
    let url = hooks.url(join_url(url_root, &basename), request);

    PathSet {
        basename,
        file,
        url,
    }
}
