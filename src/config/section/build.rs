//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! routes = "static-routes.json"       # Route catalog (JSON array of routes)
//! template = "dist/template.html"     # HTML shell with <!--app-head--> / <!--app-html-->
//! output = "dist/client"              # Served output tree
//! cache = "dist/ssg-cache"            # Durable page cache, survives clean builds
//! log = "ssg-build.log.json"          # Build log, written after every run
//! manifest = true                     # Write <output>/ssg-manifest.json
//! ```
//!
//! Relative paths are resolved against the directory of `regen.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const OUTPUT: FieldPath = FieldPath::new("build.output");
const CACHE: FieldPath = FieldPath::new("build.cache");

/// Integrity manifest file name, written at the output root.
pub const MANIFEST_FILE: &str = "ssg-manifest.json";

/// Build paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Route catalog file.
    pub routes: PathBuf,

    /// HTML template file.
    pub template: PathBuf,

    /// Output root.
    pub output: PathBuf,

    /// Cache root.
    pub cache: PathBuf,

    /// Build log file.
    pub log: PathBuf,

    /// Write the integrity manifest.
    pub manifest: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            routes: "static-routes.json".into(),
            template: "dist/template.html".into(),
            output: "dist/client".into(),
            cache: "dist/ssg-cache".into(),
            log: "ssg-build.log.json".into(),
            manifest: true,
        }
    }
}

impl BuildSectionConfig {
    /// Integrity manifest location.
    pub fn manifest_path(&self) -> PathBuf {
        self.output.join(MANIFEST_FILE)
    }

    /// Call after path normalization.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output == self.cache {
            diag.error(CACHE, format!("must differ from {OUTPUT}"));
        } else if self.output.starts_with(&self.cache) {
            diag.error(OUTPUT, format!("must not be inside {CACHE}"));
        } else if self.cache.starts_with(&self.output) {
            diag.error_with_hint(
                CACHE,
                format!("must not be inside {OUTPUT}"),
                "the cache has to survive a clean of the output directory",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_build_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.build.routes, PathBuf::from("static-routes.json"));
        assert_eq!(config.build.template, PathBuf::from("dist/template.html"));
        assert_eq!(config.build.output, PathBuf::from("dist/client"));
        assert_eq!(config.build.cache, PathBuf::from("dist/ssg-cache"));
        assert_eq!(config.build.log, PathBuf::from("ssg-build.log.json"));
        assert!(config.build.manifest);
    }

    #[test]
    fn test_manifest_path() {
        let config = test_parse_config("[build]\noutput = \"public\"\nmanifest = false");
        assert!(!config.build.manifest);
        assert_eq!(
            config.build.manifest_path(),
            PathBuf::from("public/ssg-manifest.json")
        );
    }

    #[test]
    fn test_cache_inside_output_rejected() {
        let config = test_parse_config("[build]\noutput = \"dist\"\ncache = \"dist/cache\"");
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "build.cache");
    }

    #[test]
    fn test_sibling_dirs_accepted() {
        let config = test_parse_config("");
        let mut diag = ConfigDiagnostics::new();
        config.build.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
