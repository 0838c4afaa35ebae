//! Render orchestration: the incremental build driver.
//!
//! # Pipeline
//!
//! ```text
//! snapshot cache ─► classify ─► prune orphans ─► copy SKIP ─► render GENERATE ─► persist
//!   (scan once)     (RoutePlan)                               (batches, JoinSet)   log/manifest
//! ```
//!
//! Classification happens once, before any write. Batches are strictly
//! sequential; routes within a batch render concurrently and each route's
//! outcome is isolated from its siblings.

mod worker;


use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::task::JoinSet;

use crate::cache::{CacheSnapshot, FailureMarkers, persist_failures, write_version};
use crate::catalog::{CatalogError, RouteCatalog};
use crate::config::RegenConfig;
use crate::core::{Route, is_shutdown};
use crate::logger::ProgressLine;
use crate::output::Materializer;
use crate::plan::RoutePlan;
use crate::render::{HtmlTemplate, PageComposer, Renderer, TemplateError};
use crate::report::{BuildLog, BuildManifest, FailedRoute};
use crate::utils::date::DateTimeUtc;
use crate::utils::plural_count;
use crate::{debug, log};

use worker::{Outcome, Worker};

/// Failures detected before any write; the run does not start.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("`site.url` is not configured")]
    MissingSiteUrl,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub log: BuildLog,
    pub elapsed: Duration,
}

/// Incremental build driver.
pub struct Regenerator {
    catalog: RouteCatalog,
    worker: Arc<Worker>,
    batch_size: usize,
    cache_version: String,
    retry_failed: bool,
    force: bool,
    log_path: PathBuf,
    manifest_path: Option<PathBuf>,
}

impl Regenerator {
    /// Load the route catalog and the template. Nothing is written.
    pub fn new(config: &RegenConfig, renderer: Arc<dyn Renderer>) -> Result<Self, PreconditionError> {
        let site_url = config
            .site
            .url
            .clone()
            .ok_or(PreconditionError::MissingSiteUrl)?;
        let catalog = RouteCatalog::load(&config.build.routes)?;
        let template =
            HtmlTemplate::load(&config.build.template, config.render.strip_default_meta)?;

        let composer = PageComposer::new(
            template,
            config.site.name.as_str(),
            config.render.data_global.as_str(),
            config.render.build_version.as_str(),
        );

        Ok(Self {
            catalog,
            worker: Arc::new(Worker {
                renderer,
                composer,
                materializer: Materializer::new(&config.build.cache, &config.build.output),
                site_url,
                timeout: config.render.timeout(),
            }),
            batch_size: config.render.batch_size.max(1),
            cache_version: config.cache.version.clone(),
            retry_failed: config.cache.retry_failed,
            force: false,
            log_path: config.build.log.clone(),
            manifest_path: config.build.manifest.then(|| config.build.manifest_path()),
        })
    }

    /// Ignore cached pages: render every catalog route.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    fn materializer(&self) -> &Materializer {
        &self.worker.materializer
    }

    /// Run one incremental build.
    ///
    /// Per-route failures are recorded in the build log; only unexpected
    /// I/O errors or an interrupt abort the run.
    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();
        let mut log = BuildLog::new(DateTimeUtc::now(), self.catalog.len());
        debug!(
            "regen";
            "cache {}, output {}",
            self.materializer().cache_root().display(),
            self.materializer().output_root().display()
        );
        if self.catalog.is_empty() {
            log!("regen"; "route catalog is empty, every cached page will be removed");
        } else {
            log!("regen"; "{} in catalog", plural_count(self.catalog.len(), "route"));
        }

        let snapshot = take_snapshot(self.materializer(), &self.cache_version).await?;
        if !snapshot.current && !snapshot.routes.is_empty() {
            log!("cache"; "cache version changed, rendering every route");
        }
        if self.force {
            log!("cache"; "--force given, ignoring {} cached pages", snapshot.routes.len());
        } else {
            log!("cache"; "{}", plural_count(snapshot.routes.len(), "cached page"));
        }

        let plan = RoutePlan::for_run(&self.catalog, &snapshot, self.force, self.retry_failed);
        let mut markers = snapshot.failures;

        self.remove_orphans(&plan.orphans, &mut log).await?;
        for route in &plan.orphans {
            markers.clear(route);
        }

        self.copy_skipped(&plan.skip, &mut log).await?;

        if plan.generate.is_empty() {
            log!("regen"; "all pages are up to date, no rendering needed");
        } else {
            log!("render"; "{} to render", plural_count(plan.generate.len(), "page"));
        }
        for outcome in self.render_all(&plan.generate).await? {
            match outcome.error {
                Some(error) => {
                    markers.mark(&outcome.route, error.clone());
                    log.errors.push(FailedRoute {
                        route: outcome.route,
                        error,
                    });
                }
                None => {
                    markers.clear(&outcome.route);
                    log.generated.push(outcome.route);
                }
            }
        }

        let elapsed = started.elapsed();
        self.persist(&log, &markers, elapsed)?;
        Ok(RunReport { log, elapsed })
    }

    /// Delete orphans from both roots (cache included, so they stay gone).
    async fn remove_orphans(&self, orphans: &[Route], log: &mut BuildLog) -> Result<()> {
        if !orphans.is_empty() {
            log!("regen"; "deleting {}", plural_count(orphans.len(), "orphaned page"));
        }
        for route in orphans {
            self.materializer()
                .delete_route(route)
                .await
                .with_context(|| format!("failed to delete orphaned page {route}"))?;
            debug!("regen"; "deleted {}", route);
            log.deleted.push(route.clone());
        }
        Ok(())
    }

    /// Restore SKIP routes into the output tree from the cache.
    async fn copy_skipped(&self, skip: &[Route], log: &mut BuildLog) -> Result<()> {
        let mut copied = 0;
        for route in skip {
            let found = self
                .materializer()
                .copy_to_output(route)
                .await
                .with_context(|| format!("failed to copy cached page {route}"))?;
            if found {
                copied += 1;
            } else {
                debug!("cache"; "cached page for {} vanished, nothing copied", route);
            }
            log.skipped.push(route.clone());
        }
        if !skip.is_empty() {
            log!("cache"; "copied {}", plural_count(copied, "cached page"));
        }
        Ok(())
    }

    /// Render in sequential batches. Outcomes come back in `routes` order.
    async fn render_all(&self, routes: &[Route]) -> Result<Vec<Outcome>> {
        if routes.is_empty() {
            return Ok(Vec::new());
        }
        let mut outcomes: Vec<Option<Outcome>> = vec![None; routes.len()];
        let progress = ProgressLine::new("render", &[("pages", routes.len())]);

        for (batch_index, batch) in routes.chunks(self.batch_size).enumerate() {
            if is_shutdown() {
                bail!("interrupted, build log not written");
            }
            let offset = batch_index * self.batch_size;

            let mut tasks = JoinSet::new();
            let mut slots = FxHashMap::default();
            for (i, route) in batch.iter().enumerate() {
                let slot = offset + i;
                let worker = Arc::clone(&self.worker);
                let route = route.clone();
                let handle = tasks.spawn(async move { (slot, worker.process(route).await) });
                slots.insert(handle.id(), slot);
            }

            while let Some(joined) = tasks.join_next_with_id().await {
                let (slot, outcome) = match joined {
                    Ok((_, done)) => done,
                    Err(e) => {
                        let Some(&slot) = slots.get(&e.id()) else {
                            continue;
                        };
                        let reason = if e.is_panic() {
                            "render task panicked"
                        } else {
                            "render task cancelled"
                        };
                        let outcome = self
                            .worker
                            .fall_back(routes[slot].clone(), reason.to_string())
                            .await;
                        (slot, outcome)
                    }
                };
                outcomes[slot] = Some(outcome);
                progress.inc("pages");
            }
        }

        progress.finish();
        Ok(outcomes.into_iter().flatten().collect())
    }

    /// Write the build log, manifest, failure markers and version stamp.
    fn persist(&self, log: &BuildLog, markers: &FailureMarkers, elapsed: Duration) -> Result<()> {
        log.persist(&self.log_path)
            .with_context(|| format!("failed to write build log {}", self.log_path.display()))?;

        if let Some(path) = &self.manifest_path {
            BuildManifest::new(log, &self.catalog, elapsed)
                .persist(path)
                .with_context(|| format!("failed to write manifest {}", path.display()))?;
        }

        let cache_root = self.materializer().cache_root();
        persist_failures(markers, cache_root).context("failed to write failure markers")?;
        write_version(cache_root, &self.cache_version).context("failed to write cache version")?;
        Ok(())
    }
}

/// Scan the cache root off the async workers.
pub async fn take_snapshot(materializer: &Materializer, version: &str) -> Result<CacheSnapshot> {
    let cache_root = materializer.cache_root().to_path_buf();
    let version = version.to_string();
    tokio::task::spawn_blocking(move || CacheSnapshot::take(&cache_root, &version))
        .await
        .context("cache scan task failed")?
        .context("failed to scan page cache")
}
