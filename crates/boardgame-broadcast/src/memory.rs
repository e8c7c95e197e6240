//! In-process pub/sub on `tokio::sync::broadcast` channels.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast;

use crate::{BroadcastAdapter, BroadcastError};

/// Keeps one broadcast channel per channel name, created on first
/// subscribe.
///
/// Publishing to a channel nobody listens on is not an error; the message
/// is dropped. A channel whose last subscriber went away is forgotten on
/// the next publish.
#[derive(Debug)]
pub struct MemoryAdapter {
    channels: Mutex<HashMap<String, broadcast::Sender<Vec<u8>>>>,
    capacity: usize,
}

impl MemoryAdapter {
    /// `capacity` is the per-channel buffer; subscribers further behind
    /// than that lag and skip messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Number of channels with a live sender.
    pub fn channel_count(&self) -> usize {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new(256)
    }
}

impl BroadcastAdapter for MemoryAdapter {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn publish(&self, channel: &str, message: Vec<u8>) -> Result<usize, BroadcastError> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(sender) = channels.get(channel) else {
            tracing::trace!(channel, "no subscribers, message dropped");
            return Ok(0);
        };

        match sender.send(message) {
            Ok(receivers) => Ok(receivers),
            Err(_) => {
                channels.remove(channel);
                tracing::debug!(channel, "last subscriber gone, channel removed");
                Ok(0)
            }
        }
    }

    fn subscribe(&self, channel: &str) -> Result<broadcast::Receiver<Vec<u8>>, BroadcastError> {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let receiver = match channels.get(channel) {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = broadcast::channel(self.capacity);
                channels.insert(channel.to_owned(), sender);
                receiver
            }
        };
        tracing::debug!(channel, "subscribed");
        Ok(receiver)
    }
}
