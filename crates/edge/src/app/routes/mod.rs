use axum::{Router, routing::get};

pub mod common;
pub mod pages;
pub mod portal;
pub mod system;

/// Router for everything behind the edge gate.
pub fn router() -> Router {
    Router::new()
        .route("/_portal/session", get(portal::session))
        .route("/_portal/navigation", get(portal::navigation))
        .route("/_portal/breadcrumbs", get(portal::breadcrumbs))
        .route("/_portal/explain", get(portal::explain))
        .fallback(pages::page)
}
