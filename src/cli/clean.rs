//! `regen clean`: invalidate cached pages.
//!
//! The output tree is left alone; evicted routes are rendered again by the
//! next build, which also replaces their served page.

use anyhow::{Context, Result};

use crate::cache::{clear_cache_dir, persist_failures, restore_failures};
use crate::config::RegenConfig;
use crate::core::Route;
use crate::log;
use crate::output::Materializer;

/// Evict `routes` from the cache, or remove the whole cache when empty.
pub async fn clean_cache(config: &RegenConfig, routes: &[String]) -> Result<()> {
    let cache_root = &config.build.cache;

    if routes.is_empty() {
        let existed = clear_cache_dir(cache_root)
            .with_context(|| format!("failed to remove {}", cache_root.display()))?;
        if existed {
            log!("clean"; "removed {}", cache_root.display());
        } else {
            log!("clean"; "nothing to clean");
        }
        return Ok(());
    }

    let routes = routes
        .iter()
        .map(|raw| Route::parse(raw).with_context(|| format!("invalid route `{raw}`")))
        .collect::<Result<Vec<_>>>()?;

    let materializer = Materializer::new(cache_root, &config.build.output);
    let mut markers = restore_failures(cache_root)?;
    for route in &routes {
        markers.clear(route);
        if materializer.evict(route).await? {
            log!("clean"; "evicted {}", route);
        } else {
            log!("clean"; "{} is not cached", route);
        }
    }
    persist_failures(&markers, cache_root)?;
    Ok(())
}
