//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "NextJobInfo"            # Used in fallback page titles
//! url = "https://example.com"     # Origin of the per-route render location
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{ConfigDiagnostics, FieldPath};

const NAME: FieldPath = FieldPath::new("site.name");
const URL: FieldPath = FieldPath::new("site.url");

/// Site identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site name.
    pub name: String,

    /// Public base URL. A path component is kept as a prefix of every location.
    pub url: Option<Url>,
}

impl SiteSectionConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error(NAME, "site name is required");
        }

        match &self.url {
            None => diag.error_with_hint(
                URL,
                "site url is required",
                "e.g. url = \"https://example.com\"",
            ),
            Some(url) if !matches!(url.scheme(), "http" | "https") => diag.error(
                URL,
                format!("`{url}` must be an http or https URL"),
            ),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, RegenConfig, test_parse_config};

    #[test]
    fn test_site_config() {
        let config = test_parse_config("");
        assert_eq!(config.site.name, "Test");
        assert_eq!(
            config.site.url.as_ref().map(|u| u.as_str()),
            Some("https://example.com/")
        );
    }

    #[test]
    fn test_invalid_url_rejected_at_parse() {
        let result: Result<RegenConfig, _> = toml::from_str("[site]\nurl = \"not a url\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_missing_fields() {
        let config: RegenConfig = toml::from_str("").unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_validate_non_http_scheme() {
        let config: RegenConfig =
            toml::from_str("[site]\nname = \"x\"\nurl = \"ftp://example.com\"").unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.site.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "site.url");
    }
}
