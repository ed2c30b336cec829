//! Progress reporting for trip batches.

use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use city_replay_dataset::{BuildingIdentifier, WasteSiteIdentifier};
use futures_core::Stream;
use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::animator::Trip;

static NEXT_BATCH_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(u64);

impl BatchId {
    pub(crate) fn next() -> Self {
        Self(NEXT_BATCH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Building not found: {0}")]
    BuildingNotFound(BuildingIdentifier),

    #[error("Waste site not found: {0}")]
    WasteSiteNotFound(WasteSiteIdentifier),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// What a batch is replaying
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchScope {
    Building(std::sync::Arc<str>),
    Range { from: String, to: String },
}

#[derive(Clone, Debug)]
pub enum ProgressEvent {
    /// A lookup failed; nothing was launched
    Failed(LookupError),
    /// The building has no trips
    NoTrips(BuildingIdentifier),
    /// No trip falls inside the range
    NoneInRange { from: String, to: String },
    BatchStarted {
        scope: BatchScope,
        count: usize,
        stagger_ms: u64,
    },
    /// One per launch, in launch order
    TripLaunched { index: usize, trip: Trip },
    /// Every launched trip has finished (or the batch was cancelled)
    BatchFinished { completed: usize, cancelled: usize },
}

impl ProgressEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProgressEvent::Failed(_))
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Failed(err) => write!(f, "{err}"),
            ProgressEvent::NoTrips(_) => write!(f, "No trips recorded for this building."),
            ProgressEvent::NoneInRange { .. } => write!(f, "No trips found in this date range."),
            ProgressEvent::BatchStarted {
                scope: BatchScope::Building(name),
                count,
                stagger_ms,
            } => write!(
                f,
                "Starting {count} waste trips for {name} ({:.1} s apart)...",
                *stagger_ms as f64 / 1000.0
            ),
            ProgressEvent::BatchStarted {
                scope: BatchScope::Range { from, to },
                count,
                stagger_ms,
            } => write!(
                f,
                "Starting {count} trips between {from} and {to} ({:.1} s apart)...",
                *stagger_ms as f64 / 1000.0
            ),
            ProgressEvent::TripLaunched { trip, .. } => write!(f, "{}", trip.label()),
            ProgressEvent::BatchFinished {
                completed,
                cancelled,
            } => write!(f, "Finished: {completed} completed, {cancelled} cancelled."),
        }
    }
}

/// Events of one batch. Finite: it ends when the batch does.
pub struct ProgressStream {
    rx: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl ProgressStream {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<ProgressEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Drive the stream, handing each event's text to `callback`.
    pub async fn for_each_message(mut self, mut callback: impl FnMut(String)) {
        while let Some(event) = self.next().await {
            callback(event.to_string());
        }
    }

    pub async fn collect_events(self) -> Vec<ProgressEvent> {
        self.collect().await
    }
}

impl Stream for ProgressStream {
    type Item = ProgressEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ProgressEvent::Failed(LookupError::WasteSiteNotFound("W9".into())).to_string(),
            "Waste site not found: W9"
        );
        assert_eq!(
            ProgressEvent::BatchStarted {
                scope: BatchScope::Building("X Apartment".into()),
                count: 3,
                stagger_ms: 500,
            }
            .to_string(),
            "Starting 3 waste trips for X Apartment (0.5 s apart)..."
        );
    }

    #[tokio::test]
    async fn test_stream_ends_when_sender_drops() {
        let (tx, stream) = ProgressStream::channel();
        tx.send(ProgressEvent::NoTrips("B1".into())).unwrap();
        drop(tx);

        let mut messages = Vec::new();
        stream.for_each_message(|m| messages.push(m)).await;
        assert_eq!(messages, vec!["No trips recorded for this building."]);
    }
}
