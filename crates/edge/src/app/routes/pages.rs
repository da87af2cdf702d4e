use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::json;

use campus_core::normalize;
use campus_navigation::{derive_breadcrumb, filter_for_role};

use crate::app::errors::json_error;
use crate::app::services::PortalServices;
use crate::gate::Passage;

/// Stand-in for the rendered page: the matched route plus the data a
/// layout needs to draw navigation and breadcrumbs.
pub async fn page(
    Extension(services): Extension<Arc<PortalServices>>,
    Extension(passage): Extension<Passage>,
    uri: Uri,
) -> Response {
    let path = normalize(uri.path());
    let Some(route) = services.registry().lookup(&path) else {
        return json_error(StatusCode::NOT_FOUND, "not_found", format!("no page at '{path}'"));
    };

    let mut body = json!({
        "path": path,
        "route": route.path,
        "title": route.title,
        "description": route.description,
    });

    match &passage {
        Passage::Authenticated(session) => {
            let navigation = filter_for_role(&services.navigation, session.role());
            body["breadcrumbs"] = json!(derive_breadcrumb(&navigation, &path));
            body["session"] = json!(session.summary());
            body["navigation"] = json!(navigation);
        }
        Passage::RenewalDeferred => body["renewal_required"] = json!(true),
        Passage::Anonymous => {}
    }

    Json(body).into_response()
}
