//! Single-route render pipeline: render, compose, cache, publish.
//!
//! A route never fails the run from here. Render and write errors turn
//! into a fallback page; a failed fallback is only logged.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use url::Url;

use crate::core::Route;
use crate::output::Materializer;
use crate::render::{PageComposer, RenderContext, Renderer};
use crate::utils::date::DateTimeUtc;
use crate::{debug, log};

/// What happened to one GENERATE route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub route: Route,
    /// Render or write error; the route got a fallback page.
    pub error: Option<String>,
}

/// Everything a render task needs, shared across a batch.
pub struct Worker {
    pub renderer: Arc<dyn Renderer>,
    pub composer: PageComposer,
    pub materializer: Materializer,
    pub site_url: Url,
    pub timeout: Option<Duration>,
}

impl Worker {
    pub async fn process(&self, route: Route) -> Outcome {
        match self.render_page(&route).await {
            Ok(()) => Outcome { route, error: None },
            Err(e) => self.fall_back(route, format!("{e:#}")).await,
        }
    }

    async fn render_page(&self, route: &Route) -> Result<()> {
        let ctx = RenderContext::new(&self.site_url, route);
        let render = self.renderer.render(route, &ctx);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, render)
                .await
                .map_err(|_| anyhow!("render timed out after {}s", limit.as_secs()))??,
            None => render.await?,
        };

        let html = self
            .composer
            .compose(route, &result, &DateTimeUtc::now().to_rfc3339());
        self.publish(route, html.as_bytes())
            .await
            .context("failed to write page")
    }

    /// Record the failure and publish the placeholder page instead.
    pub async fn fall_back(&self, route: Route, error: String) -> Outcome {
        log!("failed"; "{}: {}", route, error);

        let page = self.composer.fallback(&route);
        match self.publish(&route, page.as_bytes()).await {
            Ok(()) => debug!("render"; "fallback page written for {}", route),
            Err(e) => log!("failed"; "fallback page for {} not written: {:#}", route, e),
        }

        Outcome {
            route,
            error: Some(error),
        }
    }

    /// Cache first, then copy: the output never holds a page the cache lacks.
    async fn publish(&self, route: &Route, bytes: &[u8]) -> Result<()> {
        self.materializer.write_to_cache(route, bytes).await?;
        if !self.materializer.copy_to_output(route).await? {
            bail!("cached page for {route} disappeared before copy");
        }
        Ok(())
    }
}
