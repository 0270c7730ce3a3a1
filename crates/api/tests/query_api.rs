//! Integration tests for query dispatch, driven against a canned-response
//! mock of the upstream telemetry API.

mod common;

use axum::body::Body;
use axum::extract::Path;
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use common::{body_json, post_json, send};
use serde_json::json;

/// Serve canned telemetry responses on an ephemeral local port and return
/// the base URL. The canned data matches the upstream wire format the
/// client decodes.
async fn spawn_mock_upstream() -> String {
    async fn processing_states(Path(_session): Path<String>) -> Json<serde_json::Value> {
        Json(json!([
            {
                "result": { "processingTimeMoments": [100.0, 10100.0] },
                "firstReportAt": "2019-01-15T13:19:40.000Z",
                "lastReportAt": "2019-01-15T13:19:41.000Z"
            },
            {
                "result": { "processingTimeMoments": [50.0, 2600.0] },
                "firstReportAt": "2019-01-15T13:19:41.000Z",
                "lastReportAt": "2019-01-15T13:19:42.000Z"
            }
        ]))
    }

    async fn ue_states(Path(_session): Path<String>) -> Json<serde_json::Value> {
        Json(json!([
            {
                "result": {
                    "macPhyReportDl": {
                        "mcs": 27.0,
                        "macTp": 1000000.0,
                        "nbRb": 50.0,
                        "widebandCqi": 15.0
                    },
                    "rfReportDl": { "snr": 22.5 },
                    "macPhyReportUl": null,
                    "rfReportUl": null
                },
                "firstReportAt": "2019-01-15T13:19:40.000Z"
            }
        ]))
    }

    let app = Router::new()
        .route(
            "/api/sessions/{session}/processing-states",
            get(processing_states),
        )
        .route("/api/sessions/{session}/ue-states", get(ue_states));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn query_body(targets: serde_json::Value, scoped_vars: serde_json::Value) -> serde_json::Value {
    json!({
        "timezone": "browser",
        "panelId": 1,
        "range": {
            "from": "2019-01-15T13:00:00.000Z",
            "to": "2019-01-15T14:00:00.000Z"
        },
        "rangeRaw": { "from": "now-1h", "to": "now" },
        "interval": "30s",
        "targets": targets,
        "format": "json",
        "maxDataPoints": 550,
        "intervalMs": 30000,
        "type": "query",
        "scopedVars": scoped_vars
    })
}

fn session_vars() -> serde_json::Value {
    json!({ "SessionID": { "text": "srsLTE", "value": "srsLTE" } })
}

// ---------------------------------------------------------------------------
// Test: the response array is positional, with null slots for bad targets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multi_target_response_preserves_order_with_null_slots() {
    let upstream = spawn_mock_upstream().await;
    let app = common::build_test_app(&upstream, 0);

    let body = query_body(
        json!([
            { "refId": "A", "target": "ptime_DL encoding", "type": "timeseries" },
            { "refId": "B", "target": "bogus", "type": "timeseries" },
            { "refId": "C", "target": "ue_0_dl_mcs", "type": "timeseries" }
        ]),
        session_vars(),
    );
    let response = post_json(app, "/query", body).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let slots = json.as_array().expect("query response must be an array");
    assert_eq!(slots.len(), 3);

    // Slot 0: processing-time series, first moment paired with window
    // start in unix milliseconds.
    assert_eq!(slots[0]["target"], "ptime_DL encoding");
    assert_eq!(
        slots[0]["datapoints"],
        json!([[100.0, 1547558380000_i64], [50.0, 1547558381000_i64]])
    );

    // Slot 1: single-token target is silently unroutable.
    assert!(slots[1].is_null());

    // Slot 2: UE downlink MCS series.
    assert_eq!(slots[2]["target"], "ue_0_dl_mcs");
    assert_eq!(slots[2]["datapoints"], json!([[27.0, 1547558380000_i64]]));
}

// ---------------------------------------------------------------------------
// Test: stats and threshold tables
// ---------------------------------------------------------------------------

#[tokio::test]
async fn table_targets_return_stats_and_threshold_tables() {
    let upstream = spawn_mock_upstream().await;
    let app = common::build_test_app(&upstream, 0);

    let body = query_body(
        json!([
            { "refId": "A", "target": "statsptime_DL encoding", "type": "table" },
            { "refId": "B", "target": "threshold_DL encoding", "type": "table" }
        ]),
        session_vars(),
    );
    let response = post_json(app, "/query", body).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let slots = json.as_array().unwrap();
    assert_eq!(slots.len(), 2);

    // Stats: std = sqrt(m2 - m1^2); both canned records work out to 10.
    let stats = &slots[0];
    assert_eq!(stats["type"], "table");
    assert_eq!(stats["columns"][0]["text"], "Mean");
    assert_eq!(stats["columns"][1]["text"], "Std");
    assert_eq!(stats["columns"][2]["text"], "Time");
    assert_eq!(
        stats["rows"],
        json!([
            [100.0, 10.0, 1547558381_i64],
            [50.0, 10.0, 1547558382_i64]
        ])
    );

    // Threshold: static reference table, independent of telemetry.
    let threshold = &slots[1];
    assert_eq!(threshold["type"], "table");
    assert_eq!(threshold["columns"][0]["text"], "TMean");
    assert_eq!(threshold["columns"][1]["text"], "TStd");
    assert_eq!(threshold["rows"], json!([[60, 0], [0, 20]]));
}

// ---------------------------------------------------------------------------
// Test: UE throughput arrives converted to megabits per second
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ue_throughput_is_converted_to_megabits() {
    let upstream = spawn_mock_upstream().await;
    let app = common::build_test_app(&upstream, 0);

    let body = query_body(
        json!([{ "refId": "A", "target": "ue_0_dl_tp", "type": "timeseries" }]),
        session_vars(),
    );
    let response = post_json(app, "/query", body).await;

    let json = body_json(response).await;
    // 1_000_000 bytes/sec => 8.0 megabits/sec.
    assert_eq!(json[0]["datapoints"], json!([[8.0, 1547558380000_i64]]));
}

// ---------------------------------------------------------------------------
// Test: a parseable target with the wrong response type is unroutable
// ---------------------------------------------------------------------------

#[tokio::test]
async fn family_and_response_type_must_agree() {
    let upstream = spawn_mock_upstream().await;
    let app = common::build_test_app(&upstream, 0);

    let body = query_body(
        json!([
            { "refId": "A", "target": "ptime_DL encoding", "type": "table" },
            { "refId": "B", "target": "threshold_DL encoding", "type": "timeseries" }
        ]),
        session_vars(),
    );
    let response = post_json(app, "/query", body).await;

    let json = body_json(response).await;
    assert_eq!(json, json!([null, null]));
}

// ---------------------------------------------------------------------------
// Test: missing SessionID fails the whole request with a null body
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_session_scoped_variable_yields_null_body() {
    let upstream = spawn_mock_upstream().await;
    let app = common::build_test_app(&upstream, 0);

    let body = query_body(
        json!([{ "refId": "A", "target": "ptime_DL encoding", "type": "timeseries" }]),
        json!({}),
    );
    let response = post_json(app, "/query", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.is_null());
}

// ---------------------------------------------------------------------------
// Test: upstream failures become null slots, not errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_upstream_yields_null_slots() {
    // Nothing listens on this port; fetches fail with connection refused.
    let app = common::build_test_app("http://127.0.0.1:9", 0);

    let body = query_body(
        json!([
            { "refId": "A", "target": "ptime_DL encoding", "type": "timeseries" },
            { "refId": "B", "target": "ue_0_dl_mcs", "type": "timeseries" },
            { "refId": "C", "target": "threshold_DL encoding", "type": "table" }
        ]),
        session_vars(),
    );
    let response = post_json(app, "/query", body).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let slots = json.as_array().unwrap();
    assert_eq!(slots.len(), 3);
    assert!(slots[0].is_null());
    assert!(slots[1].is_null());
    // The threshold table needs no upstream and still comes back.
    assert_eq!(slots[2]["type"], "table");
}

// ---------------------------------------------------------------------------
// Test: malformed JSON returns 400 with the decode error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_body_returns_400_with_decode_error() {
    let app = common::build_test_app("http://127.0.0.1:9", 0);
    let response = send(app, Method::POST, "/query", Body::from("{not json")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(
        message.starts_with("json decode failure:"),
        "unexpected error message: {message}"
    );
}
