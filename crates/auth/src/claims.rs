//! Token claims and the temporal validity check.
//!
//! Signature trust is established upstream (the remote API issued the token
//! and verifies it on every call). This module only decodes the payload and
//! enforces the expiry window, so the edge and the client can avoid a round
//! trip for tokens that are obviously unusable.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use campus_core::UserId;

use crate::Role;

/// Claims carried by the short-lived access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    pub role: Role,

    /// Display name, when the issuer includes one.
    #[serde(default, alias = "displayName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Expiration time (seconds since the Unix epoch).
    pub exp: i64,

    /// Issued-at time (seconds since the Unix epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// Claims we rely on for the long-lived renewal token: only its expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalClaims {
    pub exp: i64,
}

/// Anything with an expiry claim.
pub trait Expiring {
    fn expires_at(&self) -> i64;
}

impl Expiring for TokenClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

impl Expiring for RenewalClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Outcome of the token validity check. Always terminal: a decode failure is
/// `Malformed`, never a propagated error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus<C = TokenClaims> {
    Missing,
    Malformed,
    Expired,
    Valid(C),
}

impl<C> TokenStatus<C> {
    pub fn is_valid(&self) -> bool {
        matches!(self, TokenStatus::Valid(_))
    }

    pub fn claims(&self) -> Option<&C> {
        match self {
            TokenStatus::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    /// Why the token cannot be used, if it cannot.
    pub fn error(&self) -> Option<TokenError> {
        match self {
            TokenStatus::Missing => Some(TokenError::Missing),
            TokenStatus::Malformed => Some(TokenError::Malformed),
            TokenStatus::Expired => Some(TokenError::Expired),
            TokenStatus::Valid(_) => None,
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("no token present")]
    Missing,

    #[error("token could not be decoded")]
    Malformed,

    #[error("token has expired")]
    Expired,
}

/// Check the access token.
pub fn check_token(token: Option<&str>, now: DateTime<Utc>) -> TokenStatus<TokenClaims> {
    inspect(token, now)
}

/// Check the renewal token: `true` when it is present, decodable and unexpired.
pub fn renewal_is_live(token: Option<&str>, now: DateTime<Utc>) -> bool {
    inspect::<RenewalClaims>(token, now).is_valid()
}

/// Decode `token` into `C` without verifying its signature and compare its
/// expiry against `now`.
///
/// - No IO
/// - No panics
pub fn inspect<C>(token: Option<&str>, now: DateTime<Utc>) -> TokenStatus<C>
where
    C: DeserializeOwned + Expiring,
{
    let token = match token.map(str::trim) {
        None | Some("") => return TokenStatus::Missing,
        Some(t) => t,
    };

    let claims = match decode_unverified::<C>(token) {
        Some(claims) => claims,
        None => {
            tracing::debug!("token payload could not be decoded");
            return TokenStatus::Malformed;
        }
    };

    if claims.expires_at() <= now.timestamp() {
        return TokenStatus::Expired;
    }

    TokenStatus::Valid(claims)
}

fn decode_unverified<C: DeserializeOwned>(token: &str) -> Option<C> {
    // Expiry is compared against the caller's clock below, not the system one.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    jsonwebtoken::decode::<C>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims)
}
