//! Failure markers: routes that ended their last render on the fallback page.
//!
//! A fallback page satisfies the cache check, so without a marker a
//! transiently failed route would never be retried. The marker file is
//! distinct from the page itself and lives at the cache root.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Route;

/// Failure marker file name (inside the cache root)
pub const FAILURES_FILE: &str = "failures.json";

/// A single persisted render failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedFailure {
    pub route: Route,
    pub error: String,
}

impl PersistedFailure {
    pub fn new(route: Route, error: impl Into<String>) -> Self {
        Self {
            route,
            error: error.into(),
        }
    }
}

/// Collection of persisted failure markers
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureMarkers {
    entries: Vec<PersistedFailure>,
}

impl FailureMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a route as failed, replacing an existing marker for the same route.
    pub fn mark(&mut self, route: &Route, error: impl Into<String>) {
        self.entries.retain(|f| &f.route != route);
        self.entries.push(PersistedFailure::new(route.clone(), error));
    }

    /// Remove the marker for a route. Returns whether one existed.
    pub fn clear(&mut self, route: &Route) -> bool {
        let before = self.entries.len();
        self.entries.retain(|f| &f.route != route);
        self.entries.len() < before
    }

    pub fn contains(&self, route: &Route) -> bool {
        self.entries.iter().any(|f| &f.route == route)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersistedFailure> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check if file content is the same as new content
fn file_content_matches(path: &Path, content: &str) -> bool {
    path.exists() && fs::read_to_string(path).is_ok_and(|existing| existing == content)
}

/// Persist failure markers to the cache root
pub fn persist_failures(markers: &FailureMarkers, cache_root: &Path) -> std::io::Result<()> {
    let path = cache_root.join(FAILURES_FILE);

    if markers.is_empty() {
        return match fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        };
    }

    fs::create_dir_all(cache_root)?;
    let json = serde_json::to_string_pretty(markers)?;

    if file_content_matches(&path, &json) {
        crate::debug!("cache"; "failure markers unchanged, skipping write");
        return Ok(());
    }

    fs::write(&path, &json)?;
    crate::debug!("cache"; "saved {} failure markers", markers.len());
    Ok(())
}

/// Restore failure markers from the cache root
pub fn restore_failures(cache_root: &Path) -> std::io::Result<FailureMarkers> {
    let path = cache_root.join(FAILURES_FILE);

    if !path.exists() {
        return Ok(FailureMarkers::new());
    }

    let json = fs::read_to_string(&path)?;
    let markers: FailureMarkers = serde_json::from_str(&json)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    crate::debug!("cache"; "restored {} failure markers", markers.len());
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn route(s: &str) -> Route {
        Route::parse(s).unwrap()
    }

    #[test]
    fn test_mark_replaces_same_route() {
        let mut markers = FailureMarkers::new();
        markers.mark(&route("/a"), "first");
        markers.mark(&route("/a"), "second");
        assert_eq!(markers.len(), 1);
        assert_eq!(markers.iter().next().unwrap().error, "second");
    }

    #[test]
    fn test_clear() {
        let mut markers = FailureMarkers::new();
        markers.mark(&route("/a"), "boom");
        assert!(markers.clear(&route("/a")));
        assert!(!markers.clear(&route("/a")));
        assert!(markers.is_empty());
    }

    #[test]
    fn test_persist_restore() {
        let dir = TempDir::new().unwrap();
        let mut markers = FailureMarkers::new();
        markers.mark(&route("/broken"), "DB timeout");

        persist_failures(&markers, dir.path()).unwrap();
        let restored = restore_failures(dir.path()).unwrap();

        assert!(restored.contains(&route("/broken")));
        assert_eq!(restored.iter().next().unwrap().error, "DB timeout");
    }

    #[test]
    fn test_persist_empty_removes_file() {
        let dir = TempDir::new().unwrap();
        let mut markers = FailureMarkers::new();
        markers.mark(&route("/broken"), "x");
        persist_failures(&markers, dir.path()).unwrap();
        assert!(dir.path().join(FAILURES_FILE).exists());

        markers.clear(&route("/broken"));
        persist_failures(&markers, dir.path()).unwrap();
        assert!(!dir.path().join(FAILURES_FILE).exists());
    }

    #[test]
    fn test_restore_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(restore_failures(dir.path()).unwrap().is_empty());
    }
}
