// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use ltescope_api::config::{ServerConfig, UpstreamConfig};
use ltescope_api::routes;
use ltescope_api::state::AppState;
use ltescope_core::annotation::AnnotationStore;
use ltescope_telemetry::TelemetryClient;

/// Build a test `ServerConfig` pointing at `upstream_base`.
///
/// Short upstream timeouts keep failure-path tests fast.
pub fn test_config(upstream_base: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        query_deadline_secs: 5,
        seed_events: 0,
        generator_period_secs: 60,
        upstream: UpstreamConfig {
            base_url: upstream_base.to_string(),
            api_key: "debug_token".to_string(),
            user_id: "kim".to_string(),
            timeout_secs: 2,
        },
    }
}

/// Build the full application router with the production middleware stack,
/// a freshly seeded annotation store, and a telemetry client pointing at
/// `upstream_base`.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(upstream_base: &str, seed_events: u32) -> Router {
    let config = test_config(upstream_base);

    let annotations = Arc::new(AnnotationStore::new());
    annotations.seed(seed_events);

    let telemetry = TelemetryClient::new(
        &config.upstream.base_url,
        &config.upstream.api_key,
        &config.upstream.user_id,
        Duration::from_secs(config.upstream.timeout_secs),
    )
    .expect("Failed to build telemetry client");

    let state = AppState {
        config: Arc::new(config),
        annotations,
        telemetry: Arc::new(telemetry),
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::router())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Send a request with the given method and raw body.
pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Body::from(body.to_string())).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body is not valid JSON")
}

/// Collect a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("response body is not UTF-8")
}
