//! Route catalog: the ordered list of routes to materialize.
//!
//! Produced by an external route enumerator as a JSON array of strings
//! (e.g. `["/", "/about", "/job/123"]`).

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::core::{Route, RouteError};

/// Route catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("route catalog `{0}` not found, run the route generator first")]
    Missing(PathBuf),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("route catalog `{0}` is not a JSON array of strings")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("invalid route at index {index} of the route catalog")]
    InvalidRoute {
        index: usize,
        #[source]
        source: RouteError,
    },
}

/// Ordered, de-duplicated list of normalized routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteCatalog {
    routes: Vec<Route>,
}

impl RouteCatalog {
    /// Load the catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.is_file() {
            return Err(CatalogError::Missing(path.to_path_buf()));
        }
        let content =
            fs::read_to_string(path).map_err(|e| CatalogError::Io(path.to_path_buf(), e))?;
        let raw: Vec<String> =
            serde_json::from_str(&content).map_err(|e| CatalogError::Parse(path.to_path_buf(), e))?;
        Self::from_raw(&raw)
    }

    /// Normalize raw route strings, keeping the first occurrence of duplicates.
    pub fn from_raw<S: AsRef<str>>(raw: &[S]) -> Result<Self, CatalogError> {
        let mut seen = FxHashSet::default();
        let mut routes = Vec::with_capacity(raw.len());

        for (index, item) in raw.iter().enumerate() {
            let route = Route::parse(item.as_ref())
                .map_err(|source| CatalogError::InvalidRoute { index, source })?;
            if seen.insert(route.clone()) {
                routes.push(route);
            } else {
                crate::debug!("catalog"; "duplicate route {} dropped", route);
            }
        }

        Ok(Self { routes })
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_normalizes_and_dedups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("static-routes.json");
        fs::write(&path, r#"["/", "/about/", "about", "/job/x"]"#).unwrap();

        let catalog = RouteCatalog::load(&path).unwrap();
        let routes: Vec<&str> = catalog.iter().map(Route::as_str).collect();
        assert_eq!(routes, vec!["/", "/about", "/job/x"]);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = RouteCatalog::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Missing(_)));
    }

    #[test]
    fn test_not_an_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routes.json");
        fs::write(&path, r#"{"routes": []}"#).unwrap();
        assert!(matches!(
            RouteCatalog::load(&path).unwrap_err(),
            CatalogError::Parse(..)
        ));
    }

    #[test]
    fn test_invalid_route_reports_index() {
        let err = RouteCatalog::from_raw(&["/", "/a/../b"]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRoute { index: 1, .. }));
    }

    #[test]
    fn test_index_file_routes_rejected() {
        let err = RouteCatalog::from_raw(&["/", "/index.html", "/a", "/a/index.html"]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidRoute {
                index: 1,
                source: RouteError::IndexSegment(_)
            }
        ));
    }

    #[test]
    fn test_reserved_routes_rejected() {
        let err = RouteCatalog::from_raw(&["/", "/assets", "/.well-known/security", "/robots.txt"])
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidRoute {
                index: 1,
                source: RouteError::Reserved(_)
            }
        ));
    }

    #[test]
    fn test_empty_catalog() {
        assert!(RouteCatalog::from_raw::<&str>(&[]).unwrap().is_empty());
    }
}
