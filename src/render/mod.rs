//! Page rendering.
//!
//! The render capability is an object-safe async trait so the orchestrator
//! can drive either the production [`CommandRenderer`] or a stub in tests.
//!
//! ```text
//! Route ──► RenderContext ──► Renderer::render ──► RenderResult
//!                                                      │
//!                         HtmlTemplate + PageComposer ◄┘──► page bytes
//! ```

mod command;
mod page;
mod template;

pub use command::CommandRenderer;
pub use page::PageComposer;
pub use template::{HtmlTemplate, TemplateError};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

use crate::core::Route;

/// Fixed user agent reported to the render command.
pub const USER_AGENT: &str = "SSR";

/// Fixed viewport reported to the render command.
pub const VIEWPORT: Viewport = Viewport {
    width: 1024,
    height: 768,
};

/// Per-route render capability.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, route: &Route, ctx: &RenderContext) -> Result<RenderResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Request environment of a single render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    #[serde(serialize_with = "serialize_url")]
    pub location: Url,
    pub origin: String,
    pub pathname: String,
    pub user_agent: &'static str,
    pub viewport: Viewport,
}

impl RenderContext {
    /// Build the context for `route` under the site URL (its path is kept as prefix).
    pub fn new(site_url: &Url, route: &Route) -> Self {
        let mut location = site_url.clone();
        let base = site_url.path().trim_end_matches('/');
        if route.is_root() {
            location.set_path(&format!("{base}/"));
        } else {
            location.set_path(&format!("{base}{route}"));
        }
        location.set_query(None);
        location.set_fragment(None);

        Self {
            origin: location.origin().ascii_serialization(),
            pathname: location.path().to_string(),
            location,
            user_agent: USER_AGENT,
            viewport: VIEWPORT,
        }
    }
}

fn serialize_url<S: Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(url.as_str())
}

/// Output of a successful render.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RenderResult {
    pub html: String,
    #[serde(default)]
    pub head: HeadFragments,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Head tags produced by the page, already serialized as HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeadFragments {
    pub title: String,
    pub meta: String,
    pub link: String,
    pub script: String,
}

impl HeadFragments {
    /// Fragments in head order: title, meta, link, script.
    pub fn concat(&self) -> String {
        [&self.title, &self.meta, &self.link, &self.script]
            .into_iter()
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn test_context_for_route() {
        let ctx = RenderContext::new(&site(), &Route::parse("/job/abc").unwrap());
        assert_eq!(ctx.location.as_str(), "https://example.com/job/abc");
        assert_eq!(ctx.origin, "https://example.com");
        assert_eq!(ctx.pathname, "/job/abc");
        assert_eq!(ctx.user_agent, "SSR");
    }

    #[test]
    fn test_context_for_root() {
        let ctx = RenderContext::new(&site(), &Route::root());
        assert_eq!(ctx.location.as_str(), "https://example.com/");
        assert_eq!(ctx.pathname, "/");
    }

    #[test]
    fn test_context_keeps_site_prefix() {
        let url = Url::parse("https://example.com/jobs/?x=1").unwrap();
        let ctx = RenderContext::new(&url, &Route::parse("/about").unwrap());
        assert_eq!(ctx.location.as_str(), "https://example.com/jobs/about");
    }

    #[test]
    fn test_context_json_shape() {
        let ctx = RenderContext::new(&site(), &Route::parse("/about").unwrap());
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["location"], "https://example.com/about");
        assert_eq!(json["userAgent"], "SSR");
        assert_eq!(json["viewport"]["width"], 1024);
        assert_eq!(json["viewport"]["height"], 768);
    }

    #[test]
    fn test_result_defaults() {
        let result: RenderResult = serde_json::from_str(r#"{"html": "<p>hi</p>"}"#).unwrap();
        assert_eq!(result.html, "<p>hi</p>");
        assert_eq!(result.head, HeadFragments::default());
        assert!(result.data.is_null());
    }

    #[test]
    fn test_head_concat_order() {
        let head = HeadFragments {
            title: "<title>t</title>".into(),
            meta: "<meta>".into(),
            link: "<link>".into(),
            script: "<script></script>".into(),
        };
        assert_eq!(head.concat(), "<title>t</title><meta><link><script></script>");
    }
}
