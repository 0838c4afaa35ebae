//! `regen build`: one incremental build.
//!
//! Phases:
//! - **Preconditions** - route catalog and template load (nothing written on failure)
//! - **Run** - classify, prune, copy, render (see [`crate::regen`])
//! - **Report** - build log, manifest, summary

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::RegenConfig;
use crate::regen::Regenerator;
use crate::render::CommandRenderer;
use crate::report::print_summary;

/// Build the site. Per-route failures do not make this fail.
pub async fn build_site(config: &RegenConfig, force: bool) -> Result<()> {
    let renderer =
        CommandRenderer::from_config(config).context("failed to set up render command")?;
    let regenerator = Regenerator::new(config, Arc::new(renderer))?.force(force);

    let report = regenerator.run().await?;
    print_summary(
        &report.log,
        report.elapsed,
        &config.build.log,
        &config.build.output,
    );
    Ok(())
}
