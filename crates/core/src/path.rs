//! Route paths: canonical form and segment-aware prefix matching.
//!
//! Route keys are compared segment by segment, so `/dashboard/users` is a
//! prefix of `/dashboard/users/42` but not of `/dashboard/usersettings`.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// A canonical route key (`/`, `/login`, `/dashboard/users`, ...).
///
/// Canonical means: leading slash, no empty, `.` or `..` segments, no trailing
/// slash (except the root), no query or fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePath(String);

impl RoutePath {
    /// Parse a configured route key. Non-canonical input is rejected rather
    /// than silently rewritten, so registry data stays exactly as written.
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        if !raw.starts_with('/') {
            return Err(ConfigError::invalid_path(raw, "must start with '/'"));
        }
        if raw.contains(['?', '#']) {
            return Err(ConfigError::invalid_path(raw, "must not carry a query or fragment"));
        }
        if normalize(raw) != raw {
            return Err(ConfigError::invalid_path(raw, "must be in canonical form"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// `true` when `self` is `other` or one of its ancestors.
    pub fn is_prefix_of(&self, other: &str) -> bool {
        is_segment_prefix(&self.0, other)
    }
}

impl core::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalise a request path into canonical form.
///
/// Query and fragment are dropped, repeated slashes collapse, `.` segments
/// vanish and `..` pops its parent (never above the root).
pub fn normalize(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut out = String::with_capacity(path.len());
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    out
}

/// Segment-aware prefix test on canonical paths.
pub fn is_segment_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }
    match path.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Iterate a canonical path and its ancestors, longest first, ending at `/`.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(path);
    core::iter::from_fn(move || {
        let current = next?;
        next = match current.rfind('/') {
            _ if current == "/" => None,
            Some(0) => Some("/"),
            Some(idx) => Some(&current[..idx]),
            None => None,
        };
        Some(current)
    })
}
