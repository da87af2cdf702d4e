//! Strongly-typed identifiers.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Identifier of a portal user, as issued by the remote API.
///
/// The remote API owns the identifier format, so it is kept opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Cow<'static, str>);

impl UserId {
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}
