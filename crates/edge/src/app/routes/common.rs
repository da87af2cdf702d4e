use axum::http::StatusCode;
use axum::response::Response;

use campus_auth::Session;

use crate::app::errors::{json_error, renewal_required};
use crate::gate::Passage;

/// The signed-in caller, or the response explaining why there is none.
pub fn caller(passage: &Passage) -> Result<&Session, Response> {
    match passage {
        Passage::Authenticated(session) => Ok(session),
        Passage::RenewalDeferred => Err(renewal_required()),
        Passage::Anonymous => Err(json_error(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "no session",
        )),
    }
}
