//! Query dispatch: routes each target of a query request through the
//! target grammar and the telemetry adapter, assembling the positional
//! response array the dashboard correlates by index.

pub mod adapter;

use std::future::Future;
use std::time::Duration;

use ltescope_core::target::TargetQuery;
use ltescope_telemetry::{TelemetryClient, TelemetryError};
use tokio::time::Instant;

use crate::protocol::{QueryRequest, QueryTarget, TargetData, TimeRange};

/// Scoped variable carrying the capture session every telemetry query is
/// narrowed to.
pub const SESSION_VAR: &str = "SessionID";

/// What happened to one target of a query request.
///
/// Every non-`Data` outcome serializes as a `null` slot on the wire; the
/// distinction exists for logs and tests.
#[derive(Debug)]
pub enum TargetOutcome {
    Data(TargetData),
    /// The target string is outside the grammar, or its family does not
    /// match the requested response shape.
    Unroutable,
    /// The upstream fetch failed; already logged at the fetch site.
    Failed,
    /// The per-request deadline ran out before this target's fetch
    /// completed.
    DeadlineExceeded,
}

impl TargetOutcome {
    /// The wire representation: data, or the `null` slot.
    pub fn into_data(self) -> Option<TargetData> {
        match self {
            TargetOutcome::Data(data) => Some(data),
            _ => None,
        }
    }
}

/// Serve a query request.
///
/// Returns `None` when the request carries no usable session scoped
/// variable -- there is no session context to query against, so the whole
/// request yields no data. Otherwise returns one slot per target,
/// positionally aligned with the request's target order.
///
/// `budget` bounds the total upstream fetch time for the request; targets
/// the deadline cuts off become empty slots while the rest of the array is
/// still returned.
pub async fn run_query(
    telemetry: &TelemetryClient,
    budget: Duration,
    request: &QueryRequest,
) -> Option<Vec<Option<TargetData>>> {
    let Some(session_id) = session_var(request) else {
        tracing::warn!("query request without a usable SessionID scoped variable, nothing to serve");
        return None;
    };

    let deadline = Instant::now() + budget;
    let mut slots = Vec::with_capacity(request.targets.len());

    for target in &request.targets {
        let outcome = dispatch_target(telemetry, &session_id, deadline, &request.range, target).await;
        match &outcome {
            TargetOutcome::Data(_) | TargetOutcome::Failed => {}
            TargetOutcome::Unroutable => tracing::debug!(
                raw_target = %target.target,
                response_type = %target.response_type,
                "unroutable target, emitting empty slot"
            ),
            TargetOutcome::DeadlineExceeded => tracing::warn!(
                raw_target = %target.target,
                "query deadline exhausted, emitting empty slot"
            ),
        }
        slots.push(outcome.into_data());
    }

    Some(slots)
}

/// Route one target by response shape and parsed family.
async fn dispatch_target(
    telemetry: &TelemetryClient,
    session_id: &str,
    deadline: Instant,
    range: &TimeRange,
    target: &QueryTarget,
) -> TargetOutcome {
    let Some(query) = TargetQuery::parse(&target.target) else {
        return TargetOutcome::Unroutable;
    };

    match (target.response_type.as_str(), query) {
        ("timeseries", TargetQuery::ProcessingTime { scope }) => {
            bounded(deadline, &target.target, async {
                adapter::processing_time_series(
                    telemetry,
                    session_id,
                    &target.target,
                    &scope,
                    &range.from,
                    &range.to,
                )
                .await
                .map(TargetData::Timeseries)
            })
            .await
        }
        (
            "timeseries",
            TargetQuery::UeState {
                scope,
                direction,
                measure,
                self_only,
            },
        ) => {
            bounded(deadline, &target.target, async {
                adapter::ue_state_series(
                    telemetry,
                    session_id,
                    &target.target,
                    &scope,
                    direction,
                    measure,
                    self_only,
                    &range.from,
                    &range.to,
                )
                .await
                .map(TargetData::Timeseries)
            })
            .await
        }
        ("table", TargetQuery::ProcessingTimeStats { scope }) => {
            bounded(deadline, &target.target, async {
                adapter::processing_time_stats(
                    telemetry,
                    session_id,
                    &target.target,
                    &scope,
                    &range.from,
                    &range.to,
                )
                .await
                .map(TargetData::Table)
            })
            .await
        }
        // Static table, no upstream fetch and no deadline concern.
        ("table", TargetQuery::ProcessingTimeThreshold { .. }) => {
            TargetOutcome::Data(TargetData::Table(adapter::threshold_table(&target.target)))
        }
        _ => TargetOutcome::Unroutable,
    }
}

/// Run an upstream fetch under the request deadline.
///
/// An already-expired deadline short-circuits without issuing the fetch;
/// an in-flight fetch is aborted when the deadline passes.
async fn bounded<F>(deadline: Instant, raw_target: &str, fetch: F) -> TargetOutcome
where
    F: Future<Output = Result<TargetData, TelemetryError>>,
{
    if Instant::now() >= deadline {
        return TargetOutcome::DeadlineExceeded;
    }

    match tokio::time::timeout_at(deadline, fetch).await {
        Err(_) => TargetOutcome::DeadlineExceeded,
        Ok(Err(err)) => {
            tracing::warn!(raw_target, error = %err, "upstream fetch failed, emitting empty slot");
            TargetOutcome::Failed
        }
        Ok(Ok(data)) => TargetOutcome::Data(data),
    }
}

/// The session id from the request's scoped variables, if present as a
/// string.
fn session_var(request: &QueryRequest) -> Option<String> {
    request
        .scoped_vars
        .get(SESSION_VAR)?
        .text
        .as_str()
        .map(str::to_owned)
}
