//! Extension points of the resize pipeline.
//!
//! Integrations that store derivatives somewhere else (a CDN mount, a
//! per-tenant directory) rewrite names and locations here instead of
//! patching the pipeline. Every method defaults to the identity.
//!
//! For each size the hooks run in this order:
//!
//! 1. [`basename`](ResizeHooks::basename): the derived file name
//! 2. [`directory`](ResizeHooks::directory): the target directory
//! 3. [`file`](ResizeHooks::file): the full output path
//! 4. [`url`](ResizeHooks::url): the public URL
//! 5. [`job`](ResizeHooks::job): the complete job, just before rendering
//! 6. [`stale_file`](ResizeHooks::stale_file): the superseded file, before
//!    it is deleted (saved batches only)

use crate::naming::PathRequest;
use crate::thumbnail::ResizeJob;
use std::path::PathBuf;

pub trait ResizeHooks: Sync {
    fn basename(&self, basename: String) -> String {
        basename
    }

    fn directory(&self, directory: PathBuf) -> PathBuf {
        directory
    }

    fn file(&self, file: PathBuf, _request: &PathRequest<'_>) -> PathBuf {
        file
    }

    fn url(&self, url: String, _request: &PathRequest<'_>) -> String {
        url
    }

    fn job(&self, job: ResizeJob) -> ResizeJob {
        job
    }

    fn stale_file(&self, file: PathBuf) -> PathBuf {
        file
    }
}

/// Hooks that change nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ResizeHooks for NoHooks {}
