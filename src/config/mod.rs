//! Configuration management for `regen.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [site] [build] [render] [cache]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # RegenConfig (this file)
//! ```
//!
//! Precedence: CLI flags > `regen.toml` > defaults. Relative paths are
//! resolved against the directory containing `regen.toml`.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BuildSectionConfig, CacheSectionConfig, RenderSectionConfig, SiteSectionConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{BuildArgs, Cli};
use crate::log;
use crate::utils::path::{normalize_path, resolve_under};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing regen.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegenConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site identity
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Build paths
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Render command and page assembly
    #[serde(default)]
    pub render: RenderSectionConfig,

    /// Page cache settings
    #[serde(default)]
    pub cache: CacheSectionConfig,
}

impl RegenConfig {
    /// Load configuration for the given CLI invocation.
    ///
    /// Searches upward from cwd for the config file; the project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = normalize_path(&config_path);
        let root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let build_args = cli.build_args();
        config.finalize(&root, build_args);
        config.validate(build_args.is_some())?;
        Ok(config)
    }

    /// Apply CLI options, then anchor every path at `root`.
    fn finalize(&mut self, root: &Path, args: Option<&BuildArgs>) {
        if let Some(args) = args {
            self.apply_build_args(args);
        }
        self.normalize_paths(root);
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply build arguments from CLI.
    fn apply_build_args(&mut self, args: &BuildArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.render.batch_size, args.batch_size.as_ref());
        Self::update_option(&mut self.render.timeout, args.timeout.as_ref());
        Self::update_option(&mut self.build.output, args.output.as_ref());
        if args.retry_failed {
            self.cache.retry_failed = true;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);

        let build = &mut self.build;
        for path in [
            &mut build.routes,
            &mut build.template,
            &mut build.output,
            &mut build.cache,
            &mut build.log,
        ] {
            *path = resolve_under(&root, path);
        }

        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration. The render command is only checked when
    /// `renders` is set (`regen build`).
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self, renders: bool) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.build.validate(&mut diag);
        self.render.validate(&mut diag);
        if renders {
            self.render.validate_command(self.get_root(), &mut diag);
        }
        self.cache.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config with minimal required `[site]` fields.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> RegenConfig {
    let config = format!("[site]\nname = \"Test\"\nurl = \"https://example.com\"\n{extra}");
    let (parsed, ignored) = RegenConfig::parse_with_ignored(&config).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
