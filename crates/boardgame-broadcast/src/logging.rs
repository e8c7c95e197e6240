//! An adapter that writes messages to the log instead of delivering them.

use tokio::sync::broadcast;

use crate::{BroadcastAdapter, BroadcastError};

/// Emits every published message as an `info` event on the
/// `boardgame_broadcast` target. Subscribing is not possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAdapter;

impl BroadcastAdapter for LogAdapter {
    fn name(&self) -> &'static str {
        "log"
    }

    fn publish(&self, channel: &str, message: Vec<u8>) -> Result<usize, BroadcastError> {
        tracing::info!(
            target: "boardgame_broadcast",
            channel,
            payload = %String::from_utf8_lossy(&message),
            "broadcast"
        );
        Ok(0)
    }

    fn subscribe(&self, _channel: &str) -> Result<broadcast::Receiver<Vec<u8>>, BroadcastError> {
        Err(BroadcastError::SubscribeUnsupported {
            adapter: self.name(),
        })
    }
}
