//! Filesystem path normalization.
//!
//! - `normalize_path` - canonicalize with an absolute fallback
//! - `resolve_under` - expand `~`, then anchor relative paths at a root

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Paths that do not exist yet are joined with the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a configured path against `root` with tilde expansion.
///
/// # Example
/// ```ignore
/// // root = /site, path = "dist/client" -> /site/dist/client
/// // root = /site, path = "~/cache"     -> $HOME/cache
/// let output = resolve_under(Path::new("/site"), Path::new("dist/client"));
/// ```
pub fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    let full = if expanded.is_relative() {
        root.join(expanded)
    } else {
        expanded
    };
    normalize_path(&full)
}
