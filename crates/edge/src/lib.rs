//! `campus-edge`: the HTTP edge of the portal.
//!
//! The [`gate::EdgeGate`] decides every request before a page renders; the
//! axum layer in [`middleware`] turns its outcome into a pass-through or a
//! single redirect.

pub mod app;
pub mod config;
pub mod gate;
pub mod middleware;
pub mod token_store;

pub use config::{EdgeConfig, EdgeConfigError};
pub use gate::{EdgeGate, GateOutcome, Passage};
pub use token_store::{RequestTokens, TokenStore};
