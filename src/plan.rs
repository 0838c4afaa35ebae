//! Route classification: which pages to copy, render, or prune.
//!
//! Computed once, synchronously, from a snapshot of the cache before any
//! page is written. Nothing downstream re-checks cache state.

use rustc_hash::FxHashSet;

use crate::cache::CacheSnapshot;
use crate::catalog::RouteCatalog;
use crate::core::Route;

/// Disjoint classification of catalog and cached routes.
///
/// - `skip` = catalog ∩ cache (catalog order)
/// - `generate` = catalog − cache (catalog order)
/// - `orphans` = cache − catalog (sorted)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePlan {
    pub skip: Vec<Route>,
    pub generate: Vec<Route>,
    pub orphans: Vec<Route>,
}

impl RoutePlan {
    /// Classify every catalog route against the cached route set.
    pub fn classify(catalog: &RouteCatalog, cached: &FxHashSet<Route>) -> Self {
        let mut plan = Self::default();
        let mut wanted = FxHashSet::default();

        for route in catalog.iter() {
            wanted.insert(route);
            if cached.contains(route) {
                plan.skip.push(route.clone());
            } else {
                plan.generate.push(route.clone());
            }
        }

        plan.orphans = cached
            .iter()
            .filter(|route| !wanted.contains(route))
            .cloned()
            .collect();
        plan.orphans.sort();

        plan
    }

    /// Move skipped routes matching `wants_render` into `generate`,
    /// keeping catalog order. Orphans are untouched.
    pub fn promote(
        mut self,
        catalog: &RouteCatalog,
        mut wants_render: impl FnMut(&Route) -> bool,
    ) -> Self {
        let skip: FxHashSet<Route> = self.skip.drain(..).collect();
        self.generate.clear();

        for route in catalog.iter() {
            if skip.contains(route) && !wants_render(route) {
                self.skip.push(route.clone());
            } else {
                self.generate.push(route.clone());
            }
        }

        self
    }

    /// Ignore cached pages: every catalog route is rendered.
    pub fn force_all(self, catalog: &RouteCatalog) -> Self {
        self.promote(catalog, |_| true)
    }

    /// Classify for a run: a stale cache version or `force` renders every
    /// route, otherwise `retry_failed` promotes routes with a failure marker.
    pub fn for_run(
        catalog: &RouteCatalog,
        snapshot: &CacheSnapshot,
        force: bool,
        retry_failed: bool,
    ) -> Self {
        let plan = Self::classify(catalog, &snapshot.routes);
        if force || !snapshot.current {
            plan.force_all(catalog)
        } else if retry_failed && !snapshot.failures.is_empty() {
            plan.promote(catalog, |route| snapshot.failures.contains(route))
        } else {
            plan
        }
    }

    /// Nothing to render and nothing to prune.
    pub fn is_up_to_date(&self) -> bool {
        self.generate.is_empty() && self.orphans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(routes: &[&str]) -> RouteCatalog {
        RouteCatalog::from_raw(routes).unwrap()
    }

    fn cached(routes: &[&str]) -> FxHashSet<Route> {
        routes.iter().map(|r| Route::parse(r).unwrap()).collect()
    }

    fn strs(routes: &[Route]) -> Vec<&str> {
        routes.iter().map(Route::as_str).collect()
    }

    #[test]
    fn test_empty_cache_generates_everything() {
        let plan = RoutePlan::classify(&catalog(&["/", "/about"]), &cached(&[]));
        assert_eq!(strs(&plan.generate), vec!["/", "/about"]);
        assert!(plan.skip.is_empty());
        assert!(plan.orphans.is_empty());
    }

    #[test]
    fn test_cached_root_is_skipped() {
        let plan = RoutePlan::classify(&catalog(&["/", "/about"]), &cached(&["/"]));
        assert_eq!(strs(&plan.skip), vec!["/"]);
        assert_eq!(strs(&plan.generate), vec!["/about"]);
    }

    #[test]
    fn test_orphans() {
        let plan = RoutePlan::classify(&catalog(&["/"]), &cached(&["/", "/old-page", "/b"]));
        assert_eq!(strs(&plan.orphans), vec!["/b", "/old-page"]);
        assert_eq!(strs(&plan.skip), vec!["/"]);
        assert!(!plan.is_up_to_date());
    }

    #[test]
    fn test_classification_is_a_partition() {
        let c = catalog(&["/", "/a", "/b", "/c/d", "/e"]);
        let k = cached(&["/a", "/c/d", "/x", "/y/z"]);
        let plan = RoutePlan::classify(&c, &k);

        let skip: FxHashSet<_> = plan.skip.iter().collect();
        let generate: FxHashSet<_> = plan.generate.iter().collect();
        assert!(skip.is_disjoint(&generate));

        let union: FxHashSet<&Route> = skip.union(&generate).copied().collect();
        let all: FxHashSet<&Route> = c.iter().collect();
        assert_eq!(union, all);

        let orphans: FxHashSet<&Route> = plan.orphans.iter().collect();
        let expected: FxHashSet<&Route> = k.iter().filter(|r| !all.contains(r)).collect();
        assert_eq!(orphans, expected);
    }

    #[test]
    fn test_force_all_keeps_catalog_order_and_orphans() {
        let c = catalog(&["/", "/a", "/b"]);
        let plan = RoutePlan::classify(&c, &cached(&["/a", "/gone"])).force_all(&c);
        assert_eq!(strs(&plan.generate), vec!["/", "/a", "/b"]);
        assert!(plan.skip.is_empty());
        assert_eq!(strs(&plan.orphans), vec!["/gone"]);
    }

    #[test]
    fn test_promote_selected_routes() {
        let c = catalog(&["/", "/a", "/b"]);
        let plan = RoutePlan::classify(&c, &cached(&["/", "/a", "/b"]))
            .promote(&c, |r| r.as_str() == "/a");
        assert_eq!(strs(&plan.skip), vec!["/", "/b"]);
        assert_eq!(strs(&plan.generate), vec!["/a"]);
    }

    fn snapshot(routes: &[&str], current: bool, failed: &[&str]) -> CacheSnapshot {
        let mut snapshot = CacheSnapshot {
            routes: cached(routes),
            current,
            ..Default::default()
        };
        for r in failed {
            snapshot.failures.mark(&Route::parse(r).unwrap(), "boom");
        }
        snapshot
    }

    #[test]
    fn test_for_run_stale_version_renders_everything() {
        let c = catalog(&["/", "/a"]);
        let plan = RoutePlan::for_run(&c, &snapshot(&["/", "/a", "/old"], false, &[]), false, false);
        assert_eq!(strs(&plan.generate), vec!["/", "/a"]);
        assert_eq!(strs(&plan.orphans), vec!["/old"]);
    }

    #[test]
    fn test_for_run_keeps_fallback_pages_by_default() {
        let c = catalog(&["/", "/broken"]);
        let s = snapshot(&["/", "/broken"], true, &["/broken"]);
        assert!(RoutePlan::for_run(&c, &s, false, false).generate.is_empty());

        let plan = RoutePlan::for_run(&c, &s, false, true);
        assert_eq!(strs(&plan.generate), vec!["/broken"]);
        assert_eq!(strs(&plan.skip), vec!["/"]);
    }

    #[test]
    fn test_up_to_date() {
        let c = catalog(&["/", "/a"]);
        assert!(RoutePlan::classify(&c, &cached(&["/", "/a"])).is_up_to_date());
    }
}
