use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};

use crate::error::AppResult;
use crate::protocol::{AnnotationResponse, AnnotationsRequest};
use crate::state::AppState;

/// OPTIONS|POST /annotations -- stored events within the requested range.
///
/// Each returned event is a copy stamped with the caller's annotation
/// descriptor; the "show line" flag is always forced on so the events are
/// visible on the timeline regardless of the saved dashboard setting.
async fn annotations(
    method: Method,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Response> {
    match method {
        Method::OPTIONS => Ok(().into_response()),
        Method::POST => {
            let request: AnnotationsRequest = super::decode_body(&body)?;

            let mut descriptor = request.annotation;
            descriptor.show_line = true;

            let events = state
                .annotations
                .events_between(request.range.from, request.range.to);
            let response: Vec<AnnotationResponse> = events
                .into_iter()
                .map(|event| AnnotationResponse {
                    annotation: descriptor.clone(),
                    event,
                })
                .collect();

            tracing::debug!(
                events = response.len(),
                name = %descriptor.name,
                "Annotation query served"
            );
            Ok(Json(response).into_response())
        }
        _ => Err(super::bad_method()),
    }
}

/// Mount the annotations endpoint.
pub fn router() -> Router<AppState> {
    Router::new().route("/annotations", any(annotations))
}
