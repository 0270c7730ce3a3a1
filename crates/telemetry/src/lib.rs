//! REST client for the upstream packet/session telemetry API.
//!
//! Fetches decoded processing-state and UE-state records for a time range,
//! scoped to a capture session. All calls take the session id explicitly so
//! one shared client can serve concurrent requests against different
//! sessions.

pub mod client;
pub mod models;

pub use client::{TelemetryClient, TelemetryError};
