//! Small shared helpers.

pub mod date;
pub mod html;
pub mod path;
mod plural;

pub use plural::plural_count;
