//! Reverse scan: reconstruct cached routes from the cache tree.

use std::ffi::OsStr;
use std::io;
use std::path::Path;

use jwalk::WalkDir;
use rustc_hash::FxHashSet;

use crate::core::{Route, is_reserved_root_name};
use crate::output::{INDEX_FILE, route_of};

/// Top-level entries outside the route space are not descended into.
fn is_skipped(name: &OsStr) -> bool {
    is_reserved_root_name(&name.to_string_lossy())
}

/// Collect every route that has an index file under `root`.
///
/// A missing root yields an empty set.
pub fn scan_routes(root: &Path) -> io::Result<FxHashSet<Route>> {
    let mut routes = FxHashSet::default();
    if !root.is_dir() {
        return Ok(routes);
    }

    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .process_read_dir(|_, _, _, children| {
            children.retain(|entry| {
                entry
                    .as_ref()
                    .map_or(true, |e| e.depth != 1 || !is_skipped(&e.file_name))
            });
        });

    for entry in walker {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() || entry.file_name() != OsStr::new(INDEX_FILE) {
            continue;
        }

        let path = entry.path();
        let Some(dir) = path.parent().and_then(|p| p.strip_prefix(root).ok()) else {
            continue;
        };
        match route_of(dir) {
            Some(route) => {
                routes.insert(route);
            }
            None => crate::debug!("cache"; "ignoring foreign page {}", path.display()),
        }
    }

    Ok(routes)
}
