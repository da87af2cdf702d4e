use chrono::{DateTime, Utc};
use serde::Serialize;

use campus_core::UserId;

use crate::{Role, TokenClaims, TokenError, TokenStatus, check_token};

/// An authenticated portal session.
///
/// Lives in process memory only; it is dropped on logout or when its token
/// stops validating.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    role: Role,
    user_id: UserId,
    display_name: String,
}

impl Session {
    pub fn new(token: impl Into<String>, role: Role, user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            role,
            user_id,
            display_name: display_name.into(),
        }
    }

    /// Build a session from already validated claims.
    pub fn from_claims(token: impl Into<String>, claims: &TokenClaims) -> Self {
        let display_name = claims
            .name
            .clone()
            .unwrap_or_else(|| claims.sub.to_string());
        Self::new(token, claims.role, claims.sub.clone(), display_name)
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Token-free view for rendering and logs.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            user_id: self.user_id.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
        }
    }
}

impl core::fmt::Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("user_id", &self.user_id)
            .field("display_name", &self.display_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
}

/// Turns a token into a session, or says why it cannot.
///
/// The portal treats this as a black-box decoder: it never talks to the
/// network on its own.
pub trait SessionResolver: Send + Sync {
    fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<Session, TokenError>;
}

/// Resolves sessions straight from the token's own claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimsSessionResolver;

impl SessionResolver for ClaimsSessionResolver {
    fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<Session, TokenError> {
        match check_token(Some(token), now) {
            TokenStatus::Valid(claims) => Ok(Session::from_claims(token, &claims)),
            TokenStatus::Missing => Err(TokenError::Missing),
            TokenStatus::Malformed => Err(TokenError::Malformed),
            TokenStatus::Expired => Err(TokenError::Expired),
        }
    }
}
