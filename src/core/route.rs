//! Route type for type-safe page addressing.
//!
//! Invariants:
//! - Always starts with `/`
//! - No trailing slash, except for the root route `/`
//! - No empty, `.` or `..` segments
//! - No `index.html` segment, no reserved first segment, so every route
//!   owns a distinct directory under the cache and output roots

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Index file holding each route's page.
pub const INDEX_FILE: &str = "index.html";

/// Top-level names that never hold pages (client assets and host files).
const RESERVED_ROOT_NAMES: &[&str] = &["assets", "_headers", "robots.txt"];

/// Whether a top-level directory name lies outside the route space.
pub fn is_reserved_root_name(name: &str) -> bool {
    name.starts_with('.') || RESERVED_ROOT_NAMES.contains(&name)
}

/// Route validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route `{0}` contains a `.` or `..` segment")]
    RelativeSegment(String),

    #[error("route `{0}` contains a backslash")]
    Backslash(String),

    #[error("route `{0}` contains a NUL byte")]
    Nul(String),

    #[error("route `{0}` contains an `index.html` segment")]
    IndexSegment(String),

    #[error("route `{0}` starts with a reserved name")]
    Reserved(String),
}

/// Normalized page route (the primary key of every cached page).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route(Arc<str>);

impl Route {
    /// Parse and normalize a raw route string.
    ///
    /// `"about/"` -> `/about`, `"//job//x"` -> `/job/x`, `""` -> `/`,
    /// `"/search?q=1"` -> `/search`.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let trimmed = raw.trim();
        let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);

        if path.contains('\\') {
            return Err(RouteError::Backslash(raw.to_string()));
        }
        if path.contains('\0') {
            return Err(RouteError::Nul(raw.to_string()));
        }

        let mut normalized = String::with_capacity(path.len() + 1);
        for (i, segment) in path.split('/').filter(|s| !s.is_empty()).enumerate() {
            if segment == "." || segment == ".." {
                return Err(RouteError::RelativeSegment(raw.to_string()));
            }
            if segment == INDEX_FILE {
                return Err(RouteError::IndexSegment(raw.to_string()));
            }
            if i == 0 && is_reserved_root_name(segment) {
                return Err(RouteError::Reserved(raw.to_string()));
            }
            normalized.push('/');
            normalized.push_str(segment);
        }

        if normalized.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(Arc::from(normalized)))
    }

    /// The root route `/`.
    pub fn root() -> Self {
        Self(Arc::from("/"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.as_ref() == "/"
    }

    /// Path segments without the leading slash (empty for root).
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Last path segment, `None` for root.
    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Route {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Route {
    type Error = RouteError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for Route {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
