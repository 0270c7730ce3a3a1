//! Telemetry adapter: shapes upstream records into dashboard responses.
//!
//! Fetch wrappers are thin; the numeric shaping lives in pure helpers so
//! the arithmetic is testable without a live telemetry API.

use chrono::{DateTime, Utc};
use ltescope_core::target::{Direction, Measure};
use ltescope_telemetry::models::{ProcessingState, UeState, UeStateResult};
use ltescope_telemetry::{TelemetryClient, TelemetryError};
use serde_json::json;

use crate::protocol::{TableColumn, TableResponse, TimeseriesResponse};

/// Per-record processing-time series: `(mean, window start ms)` in
/// upstream record order.
pub async fn processing_time_series(
    client: &TelemetryClient,
    session_id: &str,
    target: &str,
    scope: &str,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<TimeseriesResponse, TelemetryError> {
    let states = client.processing_states(session_id, scope, from, to).await?;

    Ok(TimeseriesResponse {
        target: target.to_owned(),
        datapoints: processing_points(&states, scope),
    })
}

/// Mean/Std/Time statistics table derived from the first two raw moments
/// of each processing-time record.
pub async fn processing_time_stats(
    client: &TelemetryClient,
    session_id: &str,
    target: &str,
    scope: &str,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<TableResponse, TelemetryError> {
    let states = client.processing_states(session_id, scope, from, to).await?;

    let mut table = TableResponse::new(
        target,
        vec![
            TableColumn::number("Mean"),
            TableColumn::number("Std"),
            TableColumn::number("Time"),
        ],
    );
    table.rows = stats_rows(&states, scope);
    Ok(table)
}

/// Static reference table the dashboard shades processing-time panels
/// against. Not derived from telemetry; the values are part of the
/// dashboard contract.
pub fn threshold_table(target: &str) -> TableResponse {
    let mut table = TableResponse::new(
        target,
        vec![TableColumn::number("TMean"), TableColumn::number("TStd")],
    );
    table.rows = vec![vec![json!(60), json!(0)], vec![json!(0), json!(20)]];
    table
}

/// UE radio-link measurement series for one direction and measure.
#[allow(clippy::too_many_arguments)]
pub async fn ue_state_series(
    client: &TelemetryClient,
    session_id: &str,
    target: &str,
    scope: &str,
    direction: Direction,
    measure: Measure,
    self_only: bool,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<TimeseriesResponse, TelemetryError> {
    let states = client
        .ue_states(session_id, scope, from, to, self_only)
        .await?;

    Ok(TimeseriesResponse {
        target: target.to_owned(),
        datapoints: ue_points(&states, direction, measure),
    })
}

// ---- pure shaping helpers ----

fn processing_points(states: &[ProcessingState], scope: &str) -> Vec<(f64, i64)> {
    states
        .iter()
        .filter_map(|state| {
            let Some(&mean) = state.result.processing_time_moments.first() else {
                tracing::warn!(scope, "processing state without moments, skipping record");
                return None;
            };
            Some((mean, state.first_report_at.timestamp_millis()))
        })
        .collect()
}

fn stats_rows(states: &[ProcessingState], scope: &str) -> Vec<Vec<serde_json::Value>> {
    states
        .iter()
        .filter_map(|state| {
            let moments = &state.result.processing_time_moments;
            let (Some(&m1), Some(&m2)) = (moments.first(), moments.get(1)) else {
                tracing::warn!(scope, "processing state without both moments, skipping row");
                return None;
            };

            // Population variance from the raw moments. Noisy upstream
            // aggregation can push it negative; JSON cannot carry the NaN
            // a square root would produce, so the row is dropped instead.
            let variance = m2 - m1 * m1;
            if variance < 0.0 {
                tracing::warn!(scope, m1, m2, "negative variance from upstream moments, omitting row");
                return None;
            }

            Some(vec![
                json!(m1),
                json!(variance.sqrt()),
                json!(state.last_report_at.timestamp()),
            ])
        })
        .collect()
}

fn ue_points(states: &[UeState], direction: Direction, measure: Measure) -> Vec<(f64, i64)> {
    states
        .iter()
        .filter_map(|state| {
            let value = measure_value(&state.result, direction, measure)?;
            Some((value, state.first_report_at.timestamp_millis()))
        })
        .collect()
}

/// Select the direction-appropriate report substructure, then the measure's
/// scalar. `None` when the record lacks the needed substructure (a window
/// that saw no traffic in that direction).
fn measure_value(result: &UeStateResult, direction: Direction, measure: Measure) -> Option<f64> {
    let (mac_phy, rf) = match direction {
        Direction::Downlink => (result.mac_phy_report_dl.as_ref(), result.rf_report_dl.as_ref()),
        Direction::Uplink => (result.mac_phy_report_ul.as_ref(), result.rf_report_ul.as_ref()),
    };

    Some(match measure {
        Measure::Mcs => mac_phy?.mcs,
        Measure::Snr => rf?.snr,
        // Upstream reports bytes/sec; the dashboard plots megabits/sec.
        Measure::Throughput => (mac_phy?.mac_tp / 1e6) * 8.0,
        Measure::ResourceBlocks => mac_phy?.nb_rb,
        Measure::WidebandCqi => mac_phy?.wideband_cqi,
    })
}
