//! Rendering data for the signed-in caller.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    response::Response,
};
use serde::Deserialize;

use campus_auth::{Role, SessionSummary};
use campus_navigation::{Breadcrumb, FilteredNavigation, derive_breadcrumb, filter_for_role};
use campus_routes::AccessExplanation;

use crate::app::errors::unknown_role;
use crate::app::routes::common::caller;
use crate::app::services::PortalServices;
use crate::gate::Passage;

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub path: String,
    /// Evaluate for another role instead of the caller's.
    pub role: Option<String>,
}

pub async fn session(Extension(passage): Extension<Passage>) -> Result<Json<SessionSummary>, Response> {
    Ok(Json(caller(&passage)?.summary()))
}

pub async fn navigation(
    Extension(services): Extension<Arc<PortalServices>>,
    Extension(passage): Extension<Passage>,
) -> Result<Json<FilteredNavigation>, Response> {
    let role = caller(&passage)?.role();
    Ok(Json(filter_for_role(&services.navigation, role)))
}

pub async fn breadcrumbs(
    Extension(services): Extension<Arc<PortalServices>>,
    Extension(passage): Extension<Passage>,
    Query(q): Query<PathQuery>,
) -> Result<Json<Breadcrumb>, Response> {
    let role = caller(&passage)?.role();
    let navigation = filter_for_role(&services.navigation, role);
    Ok(Json(derive_breadcrumb(&navigation, &q.path)))
}

pub async fn explain(
    Extension(services): Extension<Arc<PortalServices>>,
    Extension(passage): Extension<Passage>,
    Query(q): Query<ExplainQuery>,
) -> Result<Json<AccessExplanation>, Response> {
    let caller_role = caller(&passage)?.role();
    let role = match q.role.as_deref() {
        Some(raw) => raw.parse::<Role>().map_err(unknown_role)?,
        None => caller_role,
    };

    tracing::debug!(path = %q.path, %role, %caller_role, "explaining access decision");
    Ok(Json(services.policy.explain(&q.path, Some(role))))
}
