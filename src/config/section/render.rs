//! `[render]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [render]
//! command = ["node", "dist/server/render.mjs"]   # Invoked once per route
//! args = []                                       # Extra args, `$REGEN_*` expanded
//! batch_size = 10                                 # Routes rendered concurrently
//! timeout = 60                                    # Seconds per route, 0 disables
//! data_global = "__SSG_DATA__"                    # window.<name> = render data
//! strip_default_meta = true                       # Drop template's default head tags
//! build_version = "ssg-1.0"                       # Reported in __SSG_DEBUG__
//! ```
//!
//! The route is appended as the last argument; the render context is sent
//! as JSON on stdin and a JSON `{html, head, data}` is expected on stdout.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

const COMMAND: FieldPath = FieldPath::new("render.command");
const BATCH_SIZE: FieldPath = FieldPath::new("render.batch_size");
const DATA_GLOBAL: FieldPath = FieldPath::new("render.data_global");

/// Render command and page assembly settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSectionConfig {
    /// Render command (e.g., `["node", "render.mjs"]`).
    pub command: Vec<String>,

    /// Additional arguments placed before the route.
    pub args: Vec<String>,

    /// Maximum number of routes rendered concurrently.
    pub batch_size: usize,

    /// Per-route timeout in seconds (0 disables).
    pub timeout: u64,

    /// Global variable receiving the hydration data.
    pub data_global: String,

    /// Strip the template's default title, description and social tags.
    pub strip_default_meta: bool,

    /// Build version reported in page debug metadata.
    pub build_version: String,
}

impl Default for RenderSectionConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            args: Vec::new(),
            batch_size: 10,
            timeout: 60,
            data_global: "__SSG_DATA__".into(),
            strip_default_meta: true,
            build_version: "ssg-1.0".into(),
        }
    }
}

impl RenderSectionConfig {
    /// Per-route timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.batch_size == 0 {
            diag.error(BATCH_SIZE, "must be at least 1");
        }

        if !is_js_identifier(&self.data_global) {
            diag.error(
                DATA_GLOBAL,
                format!("`{}` is not a valid JavaScript identifier", self.data_global),
            );
        }
    }

    /// Check the render command exists, relative to the project root it runs in.
    ///
    /// Only `build` renders, so other commands skip this.
    pub fn validate_command(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        let Some(cmd) = self.command.first() else {
            diag.error_with_hint(
                COMMAND,
                "render command is not configured",
                "e.g. command = [\"node\", \"dist/server/render.mjs\"]",
            );
            return;
        };

        let found = if cmd.contains('/') {
            root.join(cmd).is_file()
        } else {
            which::which(cmd).is_ok()
        };
        if !found {
            diag.error_with_hint(
                COMMAND,
                format!("`{cmd}` not found"),
                format!("install the command or update {COMMAND}"),
            );
        }
    }
}

fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use super::is_js_identifier;
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_render_config() {
        let config = test_parse_config(
            "[render]\ncommand = [\"node\", \"render.mjs\"]\nargs = [\"--mode\", \"$REGEN_ROOT\"]\nbatch_size = 4\ntimeout = 0",
        );
        assert_eq!(config.render.command, vec!["node", "render.mjs"]);
        assert_eq!(config.render.args, vec!["--mode", "$REGEN_ROOT"]);
        assert_eq!(config.render.batch_size, 4);
        assert_eq!(config.render.timeout(), None);
    }

    #[test]
    fn test_render_config_defaults() {
        let config = test_parse_config("");
        assert!(config.render.command.is_empty());
        assert_eq!(config.render.batch_size, 10);
        assert_eq!(config.render.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.render.data_global, "__SSG_DATA__");
        assert!(config.render.strip_default_meta);
        assert_eq!(config.render.build_version, "ssg-1.0");
    }

    #[test]
    fn test_validate_collects_errors() {
        let config = test_parse_config(
            "[render]\ncommand = [\"definitely-not-a-real-command-xyz\"]\nbatch_size = 0\ndata_global = \"window.x\"",
        );
        let mut diag = ConfigDiagnostics::new();
        config.render.validate(&mut diag);
        config.render.validate_command(Path::new("/"), &mut diag);
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["render.batch_size", "render.data_global", "render.command"]
        );
    }

    #[test]
    fn test_validate_missing_command() {
        let config = test_parse_config("");
        let mut diag = ConfigDiagnostics::new();
        config.render.validate(&mut diag);
        assert!(diag.is_empty());

        config.render.validate_command(Path::new("/"), &mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "render.command");
    }

    #[test]
    fn test_js_identifier() {
        assert!(is_js_identifier("__SSG_DATA__"));
        assert!(is_js_identifier("$state1"));
        assert!(!is_js_identifier("1abc"));
        assert!(!is_js_identifier("a.b"));
        assert!(!is_js_identifier(""));
    }
}
