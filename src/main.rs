//! regen - incremental static page regenerator.
//!
//! Renders only routes missing from the durable page cache, restores the
//! rest into a freshly cleaned output tree, and prunes routes that left
//! the catalog.

mod cache;
mod catalog;
mod cli;
mod config;
mod core;
mod logger;
mod output;
mod plan;
mod regen;
mod render;
mod report;
mod utils;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::RegenConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = RegenConfig::load(&cli)?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(async {
        match &cli.command {
            Commands::Build { build_args } => cli::build::build_site(&config, build_args.force).await,
            Commands::Plan { verbose } => cli::plan::show_plan(&config, *verbose).await,
            Commands::Clean { routes } => cli::clean::clean_cache(&config, routes).await,
        }
    })
}
