//! Configuration error model.

use thiserror::Error;

/// Result type used while loading static portal configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Static configuration error.
///
/// These are raised while building the route registry or the navigation tree
/// at startup. They are fatal: a process must not serve requests with a
/// configuration that failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A path is not in canonical form.
    #[error("invalid route path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// The same path was registered twice.
    #[error("duplicate route '{0}'")]
    DuplicateRoute(String),

    /// A protected route admits no role at all.
    #[error("protected route '{0}' has no allowed roles")]
    EmptyAllowedRoles(String),

    /// No login route was configured.
    #[error("no login route configured")]
    MissingLoginRoute,

    /// The login route is not registered as a guest-only route.
    #[error("login route '{0}' must be registered as guest-only")]
    LoginRouteNotGuest(String),

    /// A role has no default landing route.
    #[error("role '{0}' has no default route")]
    MissingDefaultRoute(String),

    /// A role was given more than one default landing route.
    #[error("role '{0}' has more than one default route")]
    DuplicateDefaultRoute(String),

    /// A role's default route is not registered.
    #[error("default route '{path}' for role '{role}' is not registered")]
    UnregisteredDefaultRoute { role: String, path: String },

    /// A role's default route does not admit the role itself.
    #[error("default route '{path}' does not admit role '{role}'")]
    DefaultRouteNotPermitted { role: String, path: String },

    /// A navigation entry points at a path the registry does not know.
    #[error("navigation entry '{label}' points at unregistered path '{path}'")]
    UnregisteredNavigationPath { label: String, path: String },

    /// A navigation entry points at a guest-only page.
    #[error("navigation entry '{label}' points at guest-only path '{path}'")]
    GuestNavigationPath { label: String, path: String },

    /// A navigation category was declared without items.
    #[error("navigation category '{0}' has no items")]
    EmptyNavigationCategory(String),
}

impl ConfigError {
    pub fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}
