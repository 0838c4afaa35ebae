//! Final page assembly: head fragments, hydration data and debug metadata.

use serde::Serialize;

use super::{HtmlTemplate, RenderResult};
use crate::core::Route;
use crate::utils::html;

/// Body of the placeholder page written when a render fails.
pub const FALLBACK_BODY: &str = "<div>Loading...</div>";

/// Metadata exposed as `window.__SSG_DEBUG__` on every rendered page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugMetadata<'a> {
    route: &'a str,
    generated_at: &'a str,
    build_version: &'a str,
    content_hash: String,
}

/// Turns render results into complete HTML documents.
#[derive(Debug, Clone)]
pub struct PageComposer {
    template: HtmlTemplate,
    site_name: String,
    data_global: String,
    build_version: String,
}

impl PageComposer {
    pub fn new(
        template: HtmlTemplate,
        site_name: impl Into<String>,
        data_global: impl Into<String>,
        build_version: impl Into<String>,
    ) -> Self {
        Self {
            template,
            site_name: site_name.into(),
            data_global: data_global.into(),
            build_version: build_version.into(),
        }
    }

    /// Compose a rendered page. `generated_at` is an RFC 3339 timestamp.
    pub fn compose(&self, route: &Route, result: &RenderResult, generated_at: &str) -> String {
        let data = script_json(&result.data);
        let debug = DebugMetadata {
            route: route.as_str(),
            generated_at,
            build_version: &self.build_version,
            content_hash: content_hash(&data),
        };

        let mut head = result.head.concat();
        head.push_str(&format!(
            "<script>window.{}={};</script>",
            self.data_global, data
        ));
        head.push_str(&format!(
            "<script>window.__SSG_DEBUG__={};</script>",
            script_json(&debug)
        ));

        self.template.compose(&head, &result.html)
    }

    /// Placeholder page for a route whose render failed.
    pub fn fallback(&self, route: &Route) -> String {
        let label = match route.last_segment() {
            Some(segment) => segment.replace('-', " "),
            None => self.site_name.clone(),
        };
        let head = format!(
            "<title>{} – {}</title>",
            html::escape(&label),
            html::escape(&self.site_name)
        );
        self.template.compose(&head, FALLBACK_BODY)
    }
}

/// Serialize to JSON that cannot close the surrounding `<script>` element.
fn script_json<T: Serialize>(value: &T) -> String {
    // Serializing plain data into a String does not fail.
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace('<', "\\u003c")
}

/// First 16 hex chars of the blake3 hash of `payload`.
fn content_hash(payload: &str) -> String {
    let hash = blake3::hash(payload.as_bytes());
    hex::encode(&hash.as_bytes()[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadFragments;
    use serde_json::json;

    fn composer() -> PageComposer {
        let template = HtmlTemplate::parse(
            "<head><!--app-head--></head><body><!--app-html--></body>".to_string(),
            false,
        )
        .unwrap();
        PageComposer::new(template, "NextJobInfo", "__SSG_DATA__", "ssg-1.0")
    }

    fn route(s: &str) -> Route {
        Route::parse(s).unwrap()
    }

    #[test]
    fn test_compose_head_order() {
        let result = RenderResult {
            html: "<main>About</main>".into(),
            head: HeadFragments {
                title: "<title>About</title>".into(),
                meta: "<meta name=\"description\" content=\"a\">".into(),
                ..Default::default()
            },
            data: json!({"queries": []}),
        };
        let page = composer().compose(&route("/about"), &result, "2025-01-01T00:00:00Z");

        let title = page.find("<title>About</title>").unwrap();
        let meta = page.find("<meta name=").unwrap();
        let data = page.find("window.__SSG_DATA__={\"queries\":[]};").unwrap();
        let debug = page.find("window.__SSG_DEBUG__=").unwrap();
        assert!(title < meta && meta < data && data < debug);
        assert!(page.contains("<body><main>About</main></body>"));
    }

    #[test]
    fn test_debug_metadata() {
        let result = RenderResult {
            html: String::new(),
            data: json!(1),
            ..Default::default()
        };
        let page = composer().compose(&route("/a"), &result, "2025-01-01T00:00:00Z");
        let hash = content_hash("1");
        assert_eq!(hash.len(), 16);
        assert!(page.contains(&format!(
            "{{\"route\":\"/a\",\"generatedAt\":\"2025-01-01T00:00:00Z\",\"buildVersion\":\"ssg-1.0\",\"contentHash\":\"{hash}\"}}"
        )));
    }

    #[test]
    fn test_data_is_script_safe() {
        let result = RenderResult {
            html: String::new(),
            data: json!({"title": "</script><script>alert(1)"}),
            ..Default::default()
        };
        let page = composer().compose(&route("/x"), &result, "t");
        assert!(!page.contains("</script><script>alert"));
        assert!(page.contains("\\u003c/script>"));
    }

    #[test]
    fn test_fallback_page() {
        let page = composer().fallback(&route("/state-jobs/andhra-pradesh"));
        assert_eq!(
            page,
            "<head><title>andhra pradesh – NextJobInfo</title></head><body><div>Loading...</div></body>"
        );
    }

    #[test]
    fn test_fallback_root_uses_site_name() {
        let page = composer().fallback(&Route::root());
        assert!(page.contains("<title>NextJobInfo – NextJobInfo</title>"));
    }

    #[test]
    fn test_fallback_escapes_label() {
        let page = composer().fallback(&route("/a<b"));
        assert!(page.contains("<title>a&lt;b – NextJobInfo</title>"));
    }
}
