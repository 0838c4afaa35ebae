//! Build reporting: the persisted build log, the integrity manifest and the
//! human-readable run summary.

mod manifest;
mod summary;

pub use manifest::BuildManifest;
pub use summary::print_summary;

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Route;
use crate::utils::date::DateTimeUtc;

/// A route whose render failed this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedRoute {
    pub route: Route,
    pub error: String,
}

/// Outcome of one run. Every catalog route appears in exactly one of
/// `skipped`, `generated` or `errors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLog {
    /// Run start, RFC 3339 UTC
    pub timestamp: String,
    pub total_routes: usize,
    pub skipped: Vec<Route>,
    pub generated: Vec<Route>,
    pub deleted: Vec<Route>,
    pub errors: Vec<FailedRoute>,
}

impl BuildLog {
    pub fn new(timestamp: DateTimeUtc, total_routes: usize) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339(),
            total_routes,
            skipped: Vec::new(),
            generated: Vec::new(),
            deleted: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Write the log as pretty JSON, replacing any previous log.
    pub fn persist(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}
