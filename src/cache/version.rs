//! Cache version stamp.
//!
//! A missing or different stamp invalidates every cached page, forcing a
//! one-time full render (e.g. after head injection logic changes).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Version stamp file name (inside the cache root)
pub const VERSION_FILE: &str = "version.json";

#[derive(Debug, Serialize, Deserialize)]
struct VersionStamp {
    version: String,
}

/// Read the stamped cache version. Unreadable stamps count as missing.
pub fn read_version(cache_root: &Path) -> Option<String> {
    let json = fs::read_to_string(cache_root.join(VERSION_FILE)).ok()?;
    serde_json::from_str::<VersionStamp>(&json)
        .ok()
        .map(|stamp| stamp.version)
}

/// Whether the cache was stamped with `expected`.
pub fn is_current(cache_root: &Path, expected: &str) -> bool {
    read_version(cache_root).is_some_and(|v| v == expected)
}

/// Stamp the cache root with `version`.
pub fn write_version(cache_root: &Path, version: &str) -> std::io::Result<()> {
    fs::create_dir_all(cache_root)?;
    let json = serde_json::to_string(&VersionStamp {
        version: version.to_string(),
    })?;
    fs::write(cache_root.join(VERSION_FILE), json)
}
