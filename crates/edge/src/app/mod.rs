//! HTTP application wiring (Axum router + portal services).
//!
//! - `services.rs`: the loaded portal data (registry, policy, navigation tree)
//! - `routes/`: HTTP handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use campus_core::ConfigError;

use crate::config::EdgeConfig;
use crate::gate::EdgeGate;
use crate::middleware;

pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router from the compiled-in portal catalog.
pub fn build_app(config: EdgeConfig) -> Result<Router, ConfigError> {
    let services = services::PortalServices::load()?;
    Ok(router(config, Arc::new(services)))
}

/// Build the router around already loaded services.
pub fn router(config: EdgeConfig, services: Arc<services::PortalServices>) -> Router {
    let gate_state = middleware::GateState {
        gate: Arc::new(EdgeGate::new(services.policy.clone())),
        config: Arc::new(config),
    };

    // Everything except the health check sits behind the edge gate,
    // including the page fallback.
    let gated = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            gate_state,
            middleware::edge_gate,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(gated)
        .layer(ServiceBuilder::new())
}
