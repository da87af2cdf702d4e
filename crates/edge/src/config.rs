//! Runtime configuration for the edge server.
//!
//! Route and navigation data are compiled in; only transport details are
//! read from the environment.

use std::net::SocketAddr;

use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "CAMPUS_BIND_ADDR";
pub const ACCESS_COOKIE_VAR: &str = "CAMPUS_ACCESS_COOKIE";
pub const RENEWAL_COOKIE_VAR: &str = "CAMPUS_RENEWAL_COOKIE";
pub const RETURN_PARAM_VAR: &str = "CAMPUS_RETURN_PARAM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeConfig {
    pub bind_addr: SocketAddr,
    /// Cookie holding the short-lived access token.
    pub access_cookie: String,
    /// Cookie holding the long-lived renewal token.
    pub renewal_cookie: String,
    /// Query parameter carrying the return path on login redirects.
    pub return_param: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            access_cookie: "access_token".to_string(),
            renewal_cookie: "refresh_token".to_string(),
            return_param: "redirect".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EdgeConfigError {
    #[error("{var}: invalid socket address '{value}': {source}")]
    InvalidAddr {
        var: &'static str,
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

impl EdgeConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, EdgeConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load through an arbitrary variable lookup. Unset variables keep their
    /// defaults; set-but-invalid values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EdgeConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = match lookup(BIND_ADDR_VAR) {
            Some(value) => value
                .parse()
                .map_err(|source| EdgeConfigError::InvalidAddr {
                    var: BIND_ADDR_VAR,
                    value: value.clone(),
                    source,
                })?,
            None => {
                tracing::warn!(default = %defaults.bind_addr, "{BIND_ADDR_VAR} not set; using default");
                defaults.bind_addr
            }
        };

        Ok(Self {
            bind_addr,
            access_cookie: non_empty(&lookup, ACCESS_COOKIE_VAR, defaults.access_cookie)?,
            renewal_cookie: non_empty(&lookup, RENEWAL_COOKIE_VAR, defaults.renewal_cookie)?,
            return_param: non_empty(&lookup, RETURN_PARAM_VAR, defaults.return_param)?,
        })
    }
}

fn non_empty<F>(lookup: &F, var: &'static str, default: String) -> Result<String, EdgeConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if value.trim().is_empty() => Err(EdgeConfigError::Empty(var)),
        Some(value) => Ok(value.trim().to_string()),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let config = EdgeConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EdgeConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = EdgeConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, "127.0.0.1:3000"),
            (ACCESS_COOKIE_VAR, "portal_at"),
            (RETURN_PARAM_VAR, "next"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.access_cookie, "portal_at");
        assert_eq!(config.renewal_cookie, "refresh_token");
        assert_eq!(config.return_param, "next");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EdgeConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")])).unwrap_err();
        assert!(matches!(err, EdgeConfigError::InvalidAddr { .. }));

        let err = EdgeConfig::from_lookup(lookup(&[(RENEWAL_COOKIE_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, EdgeConfigError::Empty(RENEWAL_COOKIE_VAR)));
    }
}
