//! Render capability backed by an external command.
//!
//! One process per route:
//! - argv: `render.command` + `render.args` (`$REGEN_*` expanded) + route
//! - stdin: the [`RenderContext`] as JSON
//! - stdout: a JSON [`RenderResult`] on exit status 0
//! - stderr: the failure message otherwise

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{RenderContext, RenderResult, Renderer};
use crate::config::RegenConfig;
use crate::core::Route;

// ============================================================================
// Environment Variables
// ============================================================================

/// Build `$REGEN_*` variables shared by every render invocation
pub fn build_regen_vars(config: &RegenConfig) -> FxHashMap<String, String> {
    let mut vars = FxHashMap::default();

    vars.insert("REGEN_ROOT".into(), config.get_root().display().to_string());
    vars.insert(
        "REGEN_OUTPUT_DIR".into(),
        config.build.output.display().to_string(),
    );
    vars.insert(
        "REGEN_CACHE_DIR".into(),
        config.build.cache.display().to_string(),
    );
    if let Some(url) = &config.site.url {
        vars.insert("REGEN_SITE_URL".into(), url.to_string());
    }

    vars
}

/// Resolve `$REGEN_*` variables in command arguments
///
/// Longer names are substituted first so `$REGEN_ROOT` cannot clobber a
/// longer variable sharing its prefix.
pub fn resolve_args(args: &[String], vars: &FxHashMap<String, String>) -> Vec<String> {
    let mut keys: Vec<&String> = vars.keys().collect();
    keys.sort_by_key(|key| std::cmp::Reverse(key.len()));

    args.iter()
        .map(|arg| {
            let mut result = arg.clone();
            for key in &keys {
                result = result.replace(&format!("${key}"), &vars[*key]);
            }
            result
        })
        .collect()
}

// ============================================================================
// CommandRenderer
// ============================================================================

/// Runs the configured render command once per route.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    root: PathBuf,
    vars: FxHashMap<String, String>,
}

impl CommandRenderer {
    /// `argv[0]` is the program; the rest precede the route.
    pub fn new(
        argv: &[String],
        root: &Path,
        vars: FxHashMap<String, String>,
    ) -> Result<Self> {
        let Some((program, args)) = argv.split_first() else {
            bail!("render command is empty");
        };
        Ok(Self {
            program: program.clone(),
            args: resolve_args(args, &vars),
            root: root.to_path_buf(),
            vars,
        })
    }

    pub fn from_config(config: &RegenConfig) -> Result<Self> {
        let vars = build_regen_vars(config);
        let argv: Vec<String> = config
            .render
            .command
            .iter()
            .chain(&config.render.args)
            .cloned()
            .collect();
        Self::new(&argv, config.get_root(), vars)
    }
}

#[async_trait]
impl Renderer for CommandRenderer {
    async fn render(&self, route: &Route, ctx: &RenderContext) -> Result<RenderResult> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(route.as_str())
            .current_dir(&self.root)
            .envs(&self.vars)
            .env("REGEN_ROUTE", route.as_str())
            .env("REGEN_LOCATION", ctx.location.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to run `{}`", self.program))?;

        let input = serde_json::to_vec(ctx)?;
        if let Some(mut stdin) = child.stdin.take() {
            // The command may exit without reading its input.
            match stdin.write_all(&input).await {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            if message.is_empty() {
                bail!("render command exited with {}", output.status);
            }
            bail!("{message}");
        }

        serde_json::from_slice(&output.stdout).context("render command printed invalid JSON")
    }
}
