//! Command-line interface module.

mod args;
pub mod build;
pub mod clean;
pub mod plan;

pub use args::{BuildArgs, Cli, Commands};
