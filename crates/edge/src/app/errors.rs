use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use campus_auth::UnknownRole;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn renewal_required() -> axum::response::Response {
    json_error(
        StatusCode::UNAUTHORIZED,
        "renewal_required",
        "access token expired; renew it before retrying",
    )
}

pub fn unknown_role(err: UnknownRole) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_role", err.to_string())
}
