//! Core types - pure abstractions shared across the codebase.

mod route;
mod state;

pub use route::{INDEX_FILE, Route, RouteError, is_reserved_root_name};
pub use state::{is_shutdown, setup_shutdown_handler};
