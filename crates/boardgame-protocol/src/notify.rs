//! The notification sink the session core writes to.
//!
//! Rooms and games never talk to a pub/sub system directly. They call
//! [`Notifier::notify`] and move on: no acknowledgement, no retry, no
//! backpressure. Whatever implements the trait (a broadcaster, a logger, a
//! test recorder) owns delivery.

use std::sync::{Mutex, PoisonError};

use crate::{Event, Topic};

/// Receives `(topic, event, payload)` triples from the session core.
///
/// `notify` is synchronous and returns nothing: implementations must not
/// block on delivery and must swallow (and log) their own failures.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, topic: Topic, event: Event, payload: serde_json::Value);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _topic: Topic, _event: Event, _payload: serde_json::Value) {}
}

/// One notification captured by a [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub topic: Topic,
    pub event: Event,
    pub payload: serde_json::Value,
}

/// Keeps every notification in memory, in emission order.
///
/// Handy for tests and for embedding the core somewhere that polls for
/// changes instead of subscribing.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns just the events, in order.
    pub fn events(&self) -> Vec<Event> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|s| s.event)
            .collect()
    }

    /// Drains and returns everything recorded so far.
    pub fn take(&self) -> Vec<Sent> {
        std::mem::take(
            &mut *self.sent.lock().unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, topic: Topic, event: Event, payload: serde_json::Value) {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Sent {
                topic,
                event,
                payload,
            });
    }
}
