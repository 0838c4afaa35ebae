//! Page cache: the durable mirror of rendered pages plus its metadata.
//!
//! The cache root lives outside the output root so a clean rebuild of the
//! output never discards rendered pages.

mod failure;
mod scan;
mod version;

pub use failure::{FailureMarkers, persist_failures, restore_failures};
pub use scan::scan_routes;
pub use version::{is_current, write_version};

use std::io;
use std::path::Path;

/// Remove the whole cache root. Returns whether it existed.
pub fn clear_cache_dir(cache_root: &Path) -> io::Result<bool> {
    match std::fs::remove_dir_all(cache_root) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Snapshot of the cache taken once, before any work starts.
#[derive(Debug, Default)]
pub struct CacheSnapshot {
    /// Routes with a cached page
    pub routes: rustc_hash::FxHashSet<crate::core::Route>,
    /// Whether the version stamp matched
    pub current: bool,
    /// Routes that ended their last render on the fallback page
    pub failures: FailureMarkers,
}

impl CacheSnapshot {
    /// Scan `cache_root` and read its metadata.
    pub fn take(cache_root: &Path, version: &str) -> io::Result<Self> {
        Ok(Self {
            routes: scan_routes(cache_root)?,
            current: is_current(cache_root, version),
            failures: restore_failures(cache_root)?,
        })
    }
}
