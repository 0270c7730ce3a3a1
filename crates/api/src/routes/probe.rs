use axum::routing::any;
use axum::Router;

use crate::state::AppState;

/// ANY / -- datasource liveness probe.
///
/// The dashboard hits this when the datasource is added and reports
/// "Data source is working" only if it answers.
async fn probe() -> &'static str {
    "ok\n"
}

/// Mount the probe at `/`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", any(probe))
}
