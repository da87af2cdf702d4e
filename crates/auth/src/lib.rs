//! `campus-auth`: roles, token validity and sessions.
//!
//! This crate is intentionally decoupled from HTTP and from any remote API.

pub mod claims;
pub mod roles;
pub mod session;

pub use claims::{
    Expiring, RenewalClaims, TokenClaims, TokenError, TokenStatus, check_token, inspect,
    renewal_is_live,
};
pub use roles::{Role, RoleSet, UnknownRole};
pub use session::{ClaimsSessionResolver, Session, SessionResolver, SessionSummary};
