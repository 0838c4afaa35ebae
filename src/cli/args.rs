//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Incremental static page regenerator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: regen.toml)
    #[arg(short = 'C', long, global = true, default_value = "regen.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render stale routes, reuse cached pages and prune removed ones
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Show how each route would be handled, without writing anything
    #[command(visible_alias = "p")]
    Plan {
        /// List every route instead of counts only
        #[arg(short = 'V', long)]
        verbose: bool,
    },

    /// Evict routes from the page cache so the next build renders them again
    Clean {
        /// Routes to evict. If omitted, the whole cache is removed.
        #[arg(value_name = "ROUTE")]
        routes: Vec<String>,
    },
}

/// Build command arguments
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Number of routes rendered concurrently per batch
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Per-route render timeout in seconds (0 disables)
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Re-render routes whose last render failed and produced a fallback page
    #[arg(short, long)]
    pub retry_failed: bool,

    /// Ignore the page cache and render every route
    #[arg(short, long)]
    pub force: bool,

    /// Output directory path (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Build arguments, if the command is `build`.
    pub const fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } => Some(build_args),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::parse_from([
            "regen",
            "build",
            "-V",
            "--batch-size",
            "4",
            "--timeout",
            "0",
            "--retry-failed",
            "--force",
            "-o",
            "public",
        ]);
        let args = cli.build_args().unwrap();
        assert!(args.verbose);
        assert_eq!(args.batch_size, Some(4));
        assert_eq!(args.timeout, Some(0));
        assert!(args.retry_failed);
        assert!(args.force);
        assert_eq!(args.output, Some(PathBuf::from("public")));
        assert_eq!(cli.config, PathBuf::from("regen.toml"));
    }

    #[test]
    fn test_parse_clean_routes() {
        let cli = Cli::parse_from(["regen", "-C", "site/regen.toml", "clean", "/a", "/b"]);
        assert_eq!(cli.config, PathBuf::from("site/regen.toml"));
        match cli.command {
            Commands::Clean { routes } => assert_eq!(routes, vec!["/a", "/b"]),
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::parse_from(["regen", "plan"]).build_args().is_none());
    }
}
