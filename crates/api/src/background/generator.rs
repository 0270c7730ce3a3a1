//! Periodic annotation generator.
//!
//! Appends one annotation event to the shared store on a fixed interval
//! using `tokio::time::interval`. Runs until cancelled.

use std::sync::Arc;
use std::time::Duration;

use ltescope_core::annotation::AnnotationStore;
use tokio_util::sync::CancellationToken;

/// Run the annotation generator loop.
///
/// Appends one event per `period` tick. Runs until `cancel` is triggered.
pub async fn run(store: Arc<AnnotationStore>, period: Duration, cancel: CancellationToken) {
    tracing::info!(period_secs = period.as_secs(), "Annotation generator started");

    let mut interval = tokio::time::interval(period);
    // The first interval tick completes immediately; consume it so the
    // first generated event lands one full period after startup (seeding
    // already placed an event at roughly the current time).
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Annotation generator stopping");
                break;
            }
            _ = interval.tick() => {
                store.record_tick();
                tracing::debug!(events = store.event_count(), "Annotation generator appended event");
            }
        }
    }
}
