//! `campus-routes`: route registry and access policy.
//!
//! Pure decisions only: no HTTP, no token decoding, no clocks.

pub mod catalog;
pub mod policy;
pub mod registry;

pub use policy::{AccessExplanation, AccessPolicy, Decision, Denial, Redirect};
pub use registry::{Audience, RouteDescriptor, RouteRegistry, RouteRegistryBuilder};
