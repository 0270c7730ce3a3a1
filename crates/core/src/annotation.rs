//! In-memory annotation event store.
//!
//! An append-only sequence of timestamped marker events, seeded with
//! back-dated history at startup and grown by the periodic generator task.
//! Events are never deleted; the dashboard reads them back through a
//! time-range filter.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Spacing between synthetic seed events, in minutes.
const SEED_SPACING_MINUTES: i64 = 20;

/// A single stored annotation event.
///
/// `time` is unix milliseconds, truncated to second precision to match the
/// upstream report cadence. Display metadata (name, color, flags) is not
/// stored; the API layer stamps the caller's descriptor onto each returned
/// copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationEvent {
    /// Milliseconds since the unix epoch.
    pub time: i64,
    /// Tooltip title.
    pub title: String,
    /// Tooltip body text.
    pub text: String,
    /// Space-separated tag list.
    pub tags: String,
}

#[derive(Default)]
struct Inner {
    events: Vec<AnnotationEvent>,
    next_index: u64,
}

/// Thread-safe store of annotation events.
///
/// Both the periodic append and the range query traverse the same sequence,
/// so a single exclusive lock guards it; critical sections are short and
/// never await. Designed to be wrapped in `Arc` and shared between the
/// generator task and request handlers.
#[derive(Default)]
pub struct AnnotationStore {
    inner: Mutex<Inner>,
}

impl AnnotationStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate `count` synthetic events spaced backward from now.
    ///
    /// Events land every 20 minutes, the last one at roughly the current
    /// time, with strictly increasing timestamps and a running index
    /// starting at zero.
    pub fn seed(&self, count: u32) {
        let spacing = Duration::minutes(SEED_SPACING_MINUTES);
        let start = Utc::now() - spacing * count as i32;

        let mut inner = self.inner.lock().expect("annotation store lock poisoned");
        for i in 0..count {
            let at = start + spacing * (i as i32 + 1);
            let index = inner.next_index;
            inner.events.push(synthetic_event(at, index));
            inner.next_index += 1;
        }
    }

    /// Append one event at the current time with the next running index.
    ///
    /// Called by the generator task once per period.
    pub fn record_tick(&self) {
        let mut inner = self.inner.lock().expect("annotation store lock poisoned");
        let index = inner.next_index;
        inner.events.push(synthetic_event(Utc::now(), index));
        inner.next_index += 1;
    }

    /// Events with `from < time < to`, both bounds exclusive, in insertion
    /// (chronological) order.
    ///
    /// Bounds are compared at second precision scaled to milliseconds, the
    /// same convention the stored timestamps use, so an event exactly on
    /// either bound is excluded.
    pub fn events_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<AnnotationEvent> {
        let lower = from.timestamp() * 1000;
        let upper = to.timestamp() * 1000;

        let inner = self.inner.lock().expect("annotation store lock poisoned");
        inner
            .events
            .iter()
            .filter(|event| event.time > lower && event.time < upper)
            .cloned()
            .collect()
    }

    /// Number of stored events.
    pub fn event_count(&self) -> usize {
        let inner = self.inner.lock().expect("annotation store lock poisoned");
        inner.events.len()
    }
}

fn synthetic_event(at: DateTime<Utc>, index: u64) -> AnnotationEvent {
    AnnotationEvent {
        time: at.timestamp() * 1000,
        title: format!("event {index:04}"),
        text: format!("text about the event {index:04}"),
        tags: "atag btag ctag".to_owned(),
    }
}
