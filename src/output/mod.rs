//! Output materialization: every write to the Cache Root and Output Root.
//!
//! All operations tolerate partial prior state. Not-found conditions are
//! reported through return values; other I/O errors propagate.

mod location;

pub use location::{INDEX_FILE, location_of, route_of};

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::core::Route;

/// Writes, copies and removes route pages under the two roots.
#[derive(Debug, Clone)]
pub struct Materializer {
    cache_root: PathBuf,
    output_root: PathBuf,
}

impl Materializer {
    pub fn new(cache_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            output_root: output_root.into(),
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Cached page location of `route`.
    pub fn cache_path(&self, route: &Route) -> PathBuf {
        location_of(&self.cache_root, route)
    }

    /// Served page location of `route`.
    pub fn output_path(&self, route: &Route) -> PathBuf {
        location_of(&self.output_root, route)
    }

    /// Write page bytes into the cache, replacing any previous page.
    pub async fn write_to_cache(&self, route: &Route, bytes: &[u8]) -> io::Result<()> {
        let path = self.cache_path(route);
        ensure_parent(&path).await?;
        fs::write(&path, bytes).await
    }

    /// Copy a cached page into the output tree.
    ///
    /// Returns `Ok(false)` when the route has no cached page.
    pub async fn copy_to_output(&self, route: &Route) -> io::Result<bool> {
        let source = self.cache_path(route);
        if !fs::try_exists(&source).await? {
            return Ok(false);
        }

        let dest = self.output_path(route);
        ensure_parent(&dest).await?;
        match fs::copy(&source, &dest).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove a route from both roots, pruning directories left empty.
    pub async fn delete_route(&self, route: &Route) -> io::Result<()> {
        remove_and_prune(&self.output_root, &self.output_path(route)).await?;
        remove_and_prune(&self.cache_root, &self.cache_path(route)).await?;
        Ok(())
    }

    /// Remove a route from the cache only, so the next build regenerates it.
    ///
    /// Returns whether a cached page existed.
    pub async fn evict(&self, route: &Route) -> io::Result<bool> {
        remove_and_prune(&self.cache_root, &self.cache_path(route)).await
    }
}

/// Create the parent directory of `path` (no-op if it exists).
async fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent).await,
        None => Ok(()),
    }
}

/// Remove `file` if present, then walk up removing empty directories,
/// never removing `root` itself. Returns whether the file existed.
async fn remove_and_prune(root: &Path, file: &Path) -> io::Result<bool> {
    let existed = match fs::remove_file(file).await {
        Ok(()) => true,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e),
    };

    let mut current = file.parent();
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                current = dir.parent();
                continue;
            }
            Err(e) => return Err(e),
        };
        if entries.next_entry().await?.is_some() {
            break;
        }

        match fs::remove_dir(dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        current = dir.parent();
    }

    Ok(existed)
}
