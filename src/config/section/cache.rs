//! `[cache]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [cache]
//! version = "1"           # Bump to invalidate every cached page
//! retry_failed = false    # Re-render routes that fell back last time
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const VERSION: FieldPath = FieldPath::new("cache.version");

/// Page cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSectionConfig {
    /// Stamp compared with `<cache>/version.json`; a mismatch renders everything.
    pub version: String,

    /// Re-render routes carrying a failure marker instead of copying their fallback page.
    pub retry_failed: bool,
}

impl Default for CacheSectionConfig {
    fn default() -> Self {
        Self {
            version: "1".into(),
            retry_failed: false,
        }
    }
}

impl CacheSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.version.trim().is_empty() {
            diag.error(VERSION, "must not be empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_cache_config() {
        let config = test_parse_config("[cache]\nversion = \"2\"\nretry_failed = true");
        assert_eq!(config.cache.version, "2");
        assert!(config.cache.retry_failed);
    }

    #[test]
    fn test_cache_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.cache.version, "1");
        assert!(!config.cache.retry_failed);
    }

    #[test]
    fn test_empty_version_rejected() {
        let config = test_parse_config("[cache]\nversion = \" \"");
        let mut diag = ConfigDiagnostics::new();
        config.cache.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
