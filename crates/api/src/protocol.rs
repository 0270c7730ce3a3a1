//! Wire types for the dashboard's JSON datasource protocol.
//!
//! Field names follow the front end's camelCase convention. Request types
//! default every field the front end may omit, so older dashboard versions
//! decode cleanly; only the time range is required.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ltescope_core::annotation::AnnotationEvent;
use serde::{Deserialize, Serialize};

/// The time range a request is valid for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// The unparsed range expressions as typed into the dashboard
/// (e.g. `now-6h`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTimeRange {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

/// Display metadata of an annotation query, echoed back on every returned
/// event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDescriptor {
    /// Must match between request and response.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub datasource: String,
    #[serde(default)]
    pub icon_color: String,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub show_line: bool,
    #[serde(default)]
    pub query: String,
}

/// Body of a `POST /annotations` request.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationsRequest {
    pub range: TimeRange,
    pub annotation: AnnotationDescriptor,
}

/// One annotation event as rendered on the dashboard timeline: the stored
/// event decorated with the caller's descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationResponse {
    pub annotation: AnnotationDescriptor,
    #[serde(flatten)]
    pub event: AnnotationEvent,
}

/// One entry of a query request's `targets` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTarget {
    #[serde(default)]
    pub ref_id: String,
    /// The opaque target string, interpreted by the target grammar.
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub hide: bool,
    /// Requested response shape: `timeseries` or `table`.
    #[serde(rename = "type", default)]
    pub response_type: String,
}

/// A template variable value attached to the query request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScopedVar {
    #[serde(default)]
    pub text: serde_json::Value,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Body of a `POST /query` request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub panel_id: i64,
    pub range: TimeRange,
    #[serde(default)]
    pub range_raw: RawTimeRange,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub targets: Vec<QueryTarget>,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub max_data_points: i64,
    #[serde(default)]
    pub interval_ms: i64,
    #[serde(rename = "type", default)]
    pub request_type: String,
    #[serde(default)]
    pub scoped_vars: HashMap<String, ScopedVar>,
}

/// A timeseries result for one target.
#[derive(Debug, Clone, Serialize)]
pub struct TimeseriesResponse {
    pub target: String,
    /// `[value, unix milliseconds]` pairs in upstream record order.
    pub datapoints: Vec<(f64, i64)>,
}

/// One column of a table result.
#[derive(Debug, Clone, Serialize)]
pub struct TableColumn {
    pub text: String,
    #[serde(rename = "type")]
    pub column_type: String,
}

impl TableColumn {
    /// A numeric column with the given header.
    pub fn number(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            column_type: "number".to_owned(),
        }
    }
}

/// A table result for one target.
#[derive(Debug, Clone, Serialize)]
pub struct TableResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub target: String,
}

impl TableResponse {
    /// An empty table for `target` with the given columns.
    pub fn new(target: &str, columns: Vec<TableColumn>) -> Self {
        Self {
            kind: "table",
            columns,
            rows: Vec::new(),
            target: target.to_owned(),
        }
    }
}

/// The payload for one target slot of a query response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TargetData {
    Timeseries(TimeseriesResponse),
    Table(TableResponse),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_minimal_query_request() {
        // Older dashboards omit most fields; only the range is required.
        let json = r#"{
            "range": { "from": "2019-01-15T13:00:00.000Z", "to": "2019-01-15T14:00:00.000Z" },
            "targets": [ { "target": "ptime_DL encoding", "refId": "A", "type": "timeseries" } ],
            "scopedVars": { "SessionID": { "text": "srsLTE", "value": "srsLTE" } }
        }"#;

        let request: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.targets.len(), 1);
        assert_eq!(request.targets[0].target, "ptime_DL encoding");
        assert_eq!(request.targets[0].response_type, "timeseries");
        assert_eq!(
            request.scoped_vars["SessionID"].text.as_str(),
            Some("srsLTE")
        );
    }

    #[test]
    fn annotation_response_flattens_the_event() {
        let response = AnnotationResponse {
            annotation: AnnotationDescriptor {
                name: "deploys".to_owned(),
                show_line: true,
                ..Default::default()
            },
            event: AnnotationEvent {
                time: 1_547_558_380_000,
                title: "event 0000".to_owned(),
                text: "text about the event 0000".to_owned(),
                tags: "atag btag ctag".to_owned(),
            },
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["annotation"]["name"], "deploys");
        assert_eq!(value["annotation"]["showLine"], true);
        assert_eq!(value["time"], 1_547_558_380_000_i64);
        assert_eq!(value["title"], "event 0000");
    }

    #[test]
    fn timeseries_datapoints_serialize_as_value_time_pairs() {
        let series = TargetData::Timeseries(TimeseriesResponse {
            target: "ue_0_dl_mcs".to_owned(),
            datapoints: vec![(27.0, 1_547_558_380_000)],
        });

        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["target"], "ue_0_dl_mcs");
        assert_eq!(value["datapoints"][0][0], 27.0);
        assert_eq!(value["datapoints"][0][1], 1_547_558_380_000_i64);
    }

    #[test]
    fn table_response_is_tagged_as_table() {
        let table = TableResponse::new("threshold_X", vec![TableColumn::number("TMean")]);
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value["type"], "table");
        assert_eq!(value["columns"][0]["text"], "TMean");
        assert_eq!(value["columns"][0]["type"], "number");
    }
}
