//! Configuration section definitions.
//!
//! Each module corresponds to a section in `regen.toml`:
//!
//! | Module   | TOML Section | Purpose                                  |
//! |----------|--------------|------------------------------------------|
//! | `site`   | `[site]`     | Site name and public URL                 |
//! | `build`  | `[build]`    | Catalog, template, output and cache paths |
//! | `render` | `[render]`   | Render command, batching, page assembly  |
//! | `cache`  | `[cache]`    | Cache version stamp, failure retries     |

mod build;
mod cache;
mod render;
mod site;

pub use build::BuildSectionConfig;
pub use cache::CacheSectionConfig;
pub use render::RenderSectionConfig;
pub use site::SiteSectionConfig;
