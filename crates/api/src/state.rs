use std::sync::Arc;

use ltescope_core::annotation::AnnotationStore;
use ltescope_telemetry::TelemetryClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (all inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Annotation event store, shared with the generator task.
    pub annotations: Arc<AnnotationStore>,
    /// Upstream telemetry API client.
    pub telemetry: Arc<TelemetryClient>,
}
