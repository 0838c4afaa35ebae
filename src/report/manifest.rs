//! Integrity manifest published alongside the output tree.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use super::{BuildLog, FailedRoute};
use crate::catalog::RouteCatalog;

/// Deployment-facing summary of a run, written to `<output>/ssg-manifest.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildManifest {
    pub build_id: String,
    pub timestamp: String,
    pub pages_generated: usize,
    pub pages_skipped: usize,
    pub pages_deleted: usize,
    pub total_pages: usize,
    pub errors: Vec<FailedRoute>,
    pub performance: Performance,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// Seconds with two decimals, e.g. `"12.34s"`
    pub build_duration: String,
    /// Seconds with three decimals, `"0s"` when nothing was generated
    pub avg_time_per_page: String,
}

impl BuildManifest {
    pub fn new(log: &BuildLog, catalog: &RouteCatalog, elapsed: Duration) -> Self {
        let secs = elapsed.as_secs_f64();
        let generated = log.generated.len();
        let avg_time_per_page = if generated > 0 {
            format!("{:.3}s", secs / generated as f64)
        } else {
            "0s".to_string()
        };

        Self {
            build_id: build_id(&log.timestamp, catalog),
            timestamp: log.timestamp.clone(),
            pages_generated: generated,
            pages_skipped: log.skipped.len(),
            pages_deleted: log.deleted.len(),
            total_pages: log.total_routes,
            errors: log.errors.clone(),
            performance: Performance {
                build_duration: format!("{secs:.2}s"),
                avg_time_per_page,
            },
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    pub fn persist(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
    }
}

/// 16 hex chars of blake3 over the run timestamp and every catalog route.
fn build_id(timestamp: &str, catalog: &RouteCatalog) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(timestamp.as_bytes());
    for route in catalog.iter() {
        hasher.update(b"\n");
        hasher.update(route.as_str().as_bytes());
    }
    hex::encode(&hasher.finalize().as_bytes()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Route;
    use crate::utils::date::DateTimeUtc;

    fn log_with(generated: &[&str], skipped: &[&str]) -> BuildLog {
        let mut log = BuildLog::new(
            DateTimeUtc::from_unix(0),
            generated.len() + skipped.len(),
        );
        log.generated = generated.iter().map(|r| Route::parse(r).unwrap()).collect();
        log.skipped = skipped.iter().map(|r| Route::parse(r).unwrap()).collect();
        log
    }

    #[test]
    fn test_manifest_counts_and_timings() {
        let catalog = RouteCatalog::from_raw(&["/", "/a", "/b", "/c"]).unwrap();
        let log = log_with(&["/a", "/b", "/c", "/"], &[]);
        let manifest = BuildManifest::new(&log, &catalog, Duration::from_millis(2_000));

        assert_eq!(manifest.pages_generated, 4);
        assert_eq!(manifest.total_pages, 4);
        assert_eq!(manifest.performance.build_duration, "2.00s");
        assert_eq!(manifest.performance.avg_time_per_page, "0.500s");
        assert_eq!(manifest.build_id.len(), 16);
    }

    #[test]
    fn test_manifest_nothing_generated() {
        let catalog = RouteCatalog::from_raw(&["/"]).unwrap();
        let manifest = BuildManifest::new(&log_with(&[], &["/"]), &catalog, Duration::ZERO);
        assert_eq!(manifest.performance.avg_time_per_page, "0s");
        assert_eq!(manifest.pages_skipped, 1);

        let json = serde_json::to_value(&manifest).unwrap();
        assert!(json["buildId"].is_string());
        assert_eq!(json["performance"]["buildDuration"], "0.00s");
    }

    #[test]
    fn test_build_id_depends_on_catalog() {
        let a = RouteCatalog::from_raw(&["/a"]).unwrap();
        let b = RouteCatalog::from_raw(&["/b"]).unwrap();
        assert_ne!(build_id("t", &a), build_id("t", &b));
        assert_eq!(build_id("t", &a), build_id("t", &a));
    }
}
