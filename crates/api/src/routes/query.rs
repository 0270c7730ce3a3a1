use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};

use crate::engine;
use crate::error::AppResult;
use crate::protocol::QueryRequest;
use crate::state::AppState;

/// OPTIONS|POST /query -- multi-target metric query.
///
/// The response array is positionally aligned with the request's targets;
/// slots for unroutable or failed targets are `null`. A request without a
/// session scoped variable yields a `null` body.
async fn query(method: Method, State(state): State<AppState>, body: Bytes) -> AppResult<Response> {
    match method {
        Method::OPTIONS => Ok(().into_response()),
        Method::POST => {
            let request: QueryRequest = super::decode_body(&body)?;

            let budget = Duration::from_secs(state.config.query_deadline_secs);
            let slots = engine::run_query(&state.telemetry, budget, &request).await;

            Ok(Json(slots).into_response())
        }
        _ => Err(super::bad_method()),
    }
}

/// Mount the query endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/query", any(query))
}
