//! `campus-core`: shared primitives for the portal's authorization boundary.
//!
//! This crate contains **pure** building blocks (no HTTP, no token decoding).

pub mod error;
pub mod id;
pub mod path;

pub use error::{ConfigError, ConfigResult};
pub use id::UserId;
pub use path::{RoutePath, ancestors, is_segment_prefix, normalize};
