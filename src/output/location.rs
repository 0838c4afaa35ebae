//! Route <-> on-disk location mapping.
//!
//! `/` -> `{root}/index.html`, `/job/x` -> `{root}/job/x/index.html`.
//! Pure functions of the route string; the reverse scan relies on
//! [`route_of`] being the exact inverse of [`location_of`].

use std::path::{Component, Path, PathBuf};

pub use crate::core::INDEX_FILE;
use crate::core::Route;

/// Location of a route's index file under `root`.
pub fn location_of(root: &Path, route: &Route) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in route.segments() {
        path.push(segment);
    }
    path.push(INDEX_FILE);
    path
}

/// Reconstruct a route from the directory holding an index file,
/// relative to the root (empty path = root route).
///
/// Returns `None` for directories that no normalized route maps to
/// (non-UTF-8 names, names that normalization would rewrite).
pub fn route_of(relative_dir: &Path) -> Option<Route> {
    let mut raw = String::new();
    for component in relative_dir.components() {
        let Component::Normal(name) = component else {
            return None;
        };
        raw.push('/');
        raw.push_str(name.to_str()?);
    }

    let route = Route::parse(&raw).ok()?;
    let expected = if raw.is_empty() { "/" } else { raw.as_str() };
    (route.as_str() == expected).then_some(route)
}
