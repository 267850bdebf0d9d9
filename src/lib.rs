//! # thumbcrop
//!
//! Regenerates the derivative sizes of an image from a user-chosen crop.
//! Given an original, a selection rectangle and a catalog of named sizes,
//! it works out each size's destination dimensions, decides whether the
//! derivative needs an alpha channel, names it, renders it and (when
//! saving) records it in the media library and removes the file it
//! replaces.
//!
//! # Pipeline
//!
//! Each selected size runs the same steps, independently of its siblings:
//!
//! ```text
//! CropRequest ─► Batch ─┬─► derive_dimensions   (imaging::calculations)
//!                       ├─► derive_transparency (imaging::transparency)
//!                       ├─► derive_paths        (naming)
//!                       ├─► ResizeHooks::job    (hooks)
//!                       └─► resize_thumbnail    (thumbnail)
//!                                    │
//!                                    ▼
//!                              BatchResult { thumbnails, errors }
//! ```
//!
//! Sizes are rendered in parallel on the rayon pool. A failing size only
//! adds an entry to `errors`; a missing or unreadable original fails the
//! whole batch with a [`batch::BatchError`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`batch`] | Validates the original, filters sizes, runs the per-size pipeline and aggregates |
//! | [`thumbnail`] | Renders one size: load, crop, write, persist, remove the superseded file |
//! | [`naming`] | Derivative file names, output paths and URLs |
//! | [`imaging`] | Dimension math, border/transparency policy and the `image`-crate backend |
//! | [`hooks`] | Extension points for rewriting names, locations and jobs |
//! | [`store`] | The `MediaStore` trait the pipeline reads originals from and saves into |
//! | [`library`] | JSON-file `MediaStore` used by the CLI |
//! | [`config`] | `thumbcrop.toml` loading, merging and validation |
//! | [`types`] | Requests, size specs and results shared between modules |
//! | [`output`] | CLI output formatting |
//!
//! # Previews and Saves
//!
//! A preview (`save = false`) writes into `batch.temp_dir` and leaves the
//! library untouched, so the user can look at the result before committing.
//! A save writes next to the original, records the new file for the size and
//! deletes the one it supersedes. Deleting is best-effort: the new
//! derivative is already in place, so a leftover file is only logged.

pub mod batch;
pub mod config;
pub mod hooks;
pub mod imaging;
pub mod library;
pub mod naming;
pub mod output;
pub mod store;
pub mod thumbnail;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
