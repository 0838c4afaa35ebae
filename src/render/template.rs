//! HTML shell with head and body placeholders.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Placeholder replaced by the page head fragments.
pub const HEAD_MARKER: &str = "<!--app-head-->";
/// Placeholder replaced by the rendered page body.
pub const BODY_MARKER: &str = "<!--app-html-->";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template `{0}` not found, build the client bundle first")]
    Missing(PathBuf),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("template must contain `{marker}` exactly once, found {count}")]
    Marker { marker: &'static str, count: usize },
}

/// Default head tags that per-route fragments replace.
fn default_meta_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r#"(?i)<title[^>]*>.*?</title>"#,
            r#"|<meta[ \t\r\n]+name="(?:description|keywords|author|twitter:(?:title|description|url|image|card))"[^>]*>"#,
            r#"|<meta[ \t\r\n]+property="og:(?:title|description|url|image|image:width|image:height|site_name|type)"[^>]*>"#,
            r#"|<link[ \t\r\n]+rel="canonical"[^>]*>"#,
        ))
        .unwrap()
    })
}

/// Remove the template's default title, description and social meta tags.
pub fn strip_default_meta(source: &str) -> String {
    default_meta_regex().replace_all(source, "").into_owned()
}

/// Validated page shell.
///
/// Splicing is positional, so fragments that happen to contain a marker
/// string are inserted verbatim.
#[derive(Debug, Clone)]
pub struct HtmlTemplate {
    source: String,
    head_at: usize,
    body_at: usize,
}

impl HtmlTemplate {
    /// Read the template file once.
    pub fn load(path: &Path, strip_meta: bool) -> Result<Self, TemplateError> {
        let source = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TemplateError::Missing(path.to_path_buf()),
            _ => TemplateError::Io(path.to_path_buf(), e),
        })?;
        Self::parse(source, strip_meta)
    }

    pub fn parse(source: String, strip_meta: bool) -> Result<Self, TemplateError> {
        let source = if strip_meta {
            strip_default_meta(&source)
        } else {
            source
        };

        let head_at = find_once(&source, HEAD_MARKER)?;
        let body_at = find_once(&source, BODY_MARKER)?;
        Ok(Self {
            source,
            head_at,
            body_at,
        })
    }

    /// Substitute both placeholders.
    pub fn compose(&self, head: &str, body: &str) -> String {
        let mut slots = [
            (self.head_at, HEAD_MARKER.len(), head),
            (self.body_at, BODY_MARKER.len(), body),
        ];
        slots.sort_by_key(|(at, ..)| *at);

        let mut out = String::with_capacity(self.source.len() + head.len() + body.len());
        let mut cursor = 0;
        for (at, len, fragment) in slots {
            out.push_str(&self.source[cursor..at]);
            out.push_str(fragment);
            cursor = at + len;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

fn find_once(source: &str, marker: &'static str) -> Result<usize, TemplateError> {
    let count = source.matches(marker).count();
    match source.find(marker) {
        Some(at) if count == 1 => Ok(at),
        _ => Err(TemplateError::Marker { marker, count }),
    }
}
