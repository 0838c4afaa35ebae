//! `regen plan`: classify routes against the cache without writing anything.

use anyhow::Result;

use crate::catalog::RouteCatalog;
use crate::config::RegenConfig;
use crate::core::Route;
use crate::log;
use crate::output::Materializer;
use crate::plan::RoutePlan;
use crate::regen::take_snapshot;

/// Print how the next `regen build` would treat every route.
pub async fn show_plan(config: &RegenConfig, verbose: bool) -> Result<()> {
    let catalog = RouteCatalog::load(&config.build.routes)?;
    let materializer = Materializer::new(&config.build.cache, &config.build.output);
    let snapshot = take_snapshot(&materializer, &config.cache.version).await?;

    if !snapshot.current && !snapshot.routes.is_empty() {
        log!("plan"; "cache version is not `{}`, every route will render", config.cache.version);
    }

    let plan = RoutePlan::for_run(&catalog, &snapshot, false, config.cache.retry_failed);
    if verbose {
        print_routes("skip", &plan.skip);
        print_routes("generate", &plan.generate);
        print_routes("orphan", &plan.orphans);
        for failure in snapshot.failures.iter() {
            println!("{:<8} {} ({})", "failed", failure.route, failure.error);
        }
    }

    log!(
        "plan";
        "{} routes: {} skip, {} generate, {} orphaned",
        catalog.len(),
        plan.skip.len(),
        plan.generate.len(),
        plan.orphans.len()
    );
    if !snapshot.failures.is_empty() {
        log!(
            "plan";
            "{} routes are serving a fallback page{}",
            snapshot.failures.len(),
            if config.cache.retry_failed { " and will retry" } else { "" }
        );
    }
    if plan.is_up_to_date() {
        log!("plan"; "all pages are up to date");
    }
    Ok(())
}

fn print_routes(label: &str, routes: &[Route]) {
    for route in routes {
        println!("{label:<8} {route}");
    }
}
