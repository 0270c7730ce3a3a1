//! HTTP surface of the datasource.
//!
//! Every data endpoint follows the same protocol: `OPTIONS` is a CORS
//! no-op, `POST` carries a JSON body, and any other method is a 400.

pub mod annotations;
pub mod probe;
pub mod query;
pub mod search;

use axum::body::Bytes;
use axum::Router;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;

/// Build the datasource route tree.
///
/// ```text
/// ANY          /               liveness probe
/// OPTIONS|POST /annotations    annotation events in range
/// OPTIONS|POST /query          multi-target metric query
/// OPTIONS|POST /search         target manifest
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(probe::router())
        .merge(annotations::router())
        .merge(query::router())
        .merge(search::router())
}

/// Decode a POST body, surfacing the serde error text in the 400 response
/// so dashboard configuration mistakes are debuggable from the browser.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|err| AppError::BadRequest(format!("json decode failure: {err}")))
}

/// The 400 returned for any method other than OPTIONS or POST.
pub(crate) fn bad_method() -> AppError {
    AppError::BadRequest("bad method; supported OPTIONS, POST".to_owned())
}
