use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};

use ltescope_core::target::TargetQuery;

use crate::error::AppResult;
use crate::state::AppState;

/// OPTIONS|POST /search -- manifest of every target string this backend
/// understands.
///
/// Generated from the grammar's own enumeration, so the dashboard's
/// metric picker stays in lockstep with the parser.
async fn search(method: Method) -> AppResult<Response> {
    match method {
        Method::OPTIONS => Ok(().into_response()),
        Method::POST => Ok(Json(TargetQuery::manifest()).into_response()),
        _ => Err(super::bad_method()),
    }
}

/// Mount the search endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/search", any(search))
}
