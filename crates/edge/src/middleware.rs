use std::sync::Arc;

use axum::{
    extract::State,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::config::EdgeConfig;
use crate::gate::{EdgeGate, GateOutcome, location};
use crate::token_store::RequestTokens;

#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<EdgeGate>,
    pub config: Arc<EdgeConfig>,
}

/// Runs the edge gate on every request that reaches the portal router.
///
/// Pass-throughs carry a [`crate::gate::Passage`] in the request extensions;
/// everything else becomes a single `307` redirect.
pub async fn edge_gate(
    State(state): State<GateState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let tokens = RequestTokens::from_headers(req.headers(), &state.config);
    let path = req.uri().path().to_string();

    match state.gate.evaluate(&path, &tokens, Utc::now()) {
        GateOutcome::PassThrough(passage) => {
            tracing::debug!(%path, ?passage, "edge gate pass-through");
            req.extensions_mut().insert(passage);
            next.run(req).await
        }
        GateOutcome::Redirect { redirect, reason } => {
            let to = location(&redirect, req.uri().query(), &state.config.return_param);
            tracing::info!(%path, target = %redirect.target, ?reason, "edge gate redirect");
            Redirect::temporary(&to).into_response()
        }
    }
}
