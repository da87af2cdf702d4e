//! Request-scoped token store.

use axum::http::{HeaderMap, header};

use crate::config::EdgeConfig;

/// Read-only access to the tokens a request carries.
pub trait TokenStore {
    /// Short-lived access token.
    fn access_token(&self) -> Option<&str>;

    /// Long-lived renewal token.
    fn renewal_token(&self) -> Option<&str>;
}

/// Tokens extracted from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestTokens {
    access: Option<String>,
    renewal: Option<String>,
}

impl RequestTokens {
    pub fn new(access: Option<String>, renewal: Option<String>) -> Self {
        Self { access, renewal }
    }

    /// `Authorization: Bearer` wins over the access cookie; the renewal token
    /// only travels as a cookie.
    pub fn from_headers(headers: &HeaderMap, config: &EdgeConfig) -> Self {
        let access = bearer(headers).or_else(|| cookie(headers, &config.access_cookie));
        let renewal = cookie(headers, &config.renewal_cookie);
        Self { access, renewal }
    }
}

impl TokenStore for RequestTokens {
    fn access_token(&self) -> Option<&str> {
        self.access.as_deref()
    }

    fn renewal_token(&self) -> Option<&str> {
        self.renewal.as_deref()
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn reads_tokens_from_cookies() {
        let h = headers(&[(header::COOKIE, "theme=dark; access_token=abc; refresh_token=\"def\"")]);
        let tokens = RequestTokens::from_headers(&h, &EdgeConfig::default());
        assert_eq!(tokens.access_token(), Some("abc"));
        assert_eq!(tokens.renewal_token(), Some("def"));
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer from-header"),
            (header::COOKIE, "access_token=from-cookie"),
        ]);
        let tokens = RequestTokens::from_headers(&h, &EdgeConfig::default());
        assert_eq!(tokens.access_token(), Some("from-header"));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        for value in ["bearer abc", "BEARER abc", "Bearer  abc"] {
            let h = headers(&[(header::AUTHORIZATION, value)]);
            let tokens = RequestTokens::from_headers(&h, &EdgeConfig::default());
            assert_eq!(tokens.access_token(), Some("abc"), "{value}");
        }

        let h = headers(&[(header::AUTHORIZATION, "Basic abc")]);
        assert_eq!(RequestTokens::from_headers(&h, &EdgeConfig::default()).access_token(), None);
    }

    #[test]
    fn multiple_cookie_headers_are_searched() {
        let h = headers(&[(header::COOKIE, "a=1"), (header::COOKIE, "refresh_token=r")]);
        let tokens = RequestTokens::from_headers(&h, &EdgeConfig::default());
        assert_eq!(tokens.access_token(), None);
        assert_eq!(tokens.renewal_token(), Some("r"));
    }

    #[test]
    fn empty_values_count_as_absent() {
        let h = headers(&[(header::AUTHORIZATION, "Bearer   "), (header::COOKIE, "access_token=")]);
        let tokens = RequestTokens::from_headers(&h, &EdgeConfig::default());
        assert_eq!(tokens, RequestTokens::default());
    }

    #[test]
    fn cookie_names_follow_config() {
        let config = EdgeConfig {
            access_cookie: "portal_at".to_string(),
            ..EdgeConfig::default()
        };
        let h = headers(&[(header::COOKIE, "access_token=x; portal_at=y")]);
        assert_eq!(RequestTokens::from_headers(&h, &config).access_token(), Some("y"));
    }
}
