//! Decoded record types returned by the telemetry API.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Aggregated processing-time state for one baseband function, covering a
/// reporting window.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingState {
    pub result: ProcessingResult,
    /// Start of the reporting window.
    pub first_report_at: DateTime<Utc>,
    /// End of the reporting window.
    pub last_report_at: DateTime<Utc>,
}

/// Measurement payload of a processing-time state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    /// Raw statistical moments of the processing time in microseconds:
    /// index 0 is the mean, index 1 the mean of squares. The upstream
    /// aggregation may emit fewer than two entries for sparse windows.
    pub processing_time_moments: Vec<f64>,
}

/// Radio-link state for one UE (or the serving side) over a reporting
/// window.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UeState {
    pub result: UeStateResult,
    /// Start of the reporting window.
    pub first_report_at: DateTime<Utc>,
}

/// Per-direction report substructures of a UE state.
///
/// A window that saw traffic in only one direction omits the other
/// direction's reports.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UeStateResult {
    pub mac_phy_report_dl: Option<MacPhyReport>,
    pub mac_phy_report_ul: Option<MacPhyReport>,
    pub rf_report_dl: Option<RfReport>,
    pub rf_report_ul: Option<RfReport>,
}

/// MAC/PHY-layer measurements for one link direction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacPhyReport {
    /// Modulation and coding scheme index.
    pub mcs: f64,
    /// MAC-layer throughput in bytes per second.
    pub mac_tp: f64,
    /// Allocated resource block count.
    pub nb_rb: f64,
    /// Wideband channel quality indicator.
    pub wideband_cqi: f64,
}

/// RF-layer measurements for one link direction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfReport {
    /// Signal-to-noise ratio in dB.
    pub snr: f64,
}
