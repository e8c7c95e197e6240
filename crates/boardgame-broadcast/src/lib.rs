//! Broadcasting layer for board game sessions.
//!
//! A [`Broadcaster`] turns `(topic, event, payload)` into a timestamped
//! [`Notification`](boardgame_protocol::Notification), encodes it, and
//! publishes the bytes on a named channel through a [`BroadcastAdapter`].
//! Because it implements [`Notifier`](boardgame_protocol::Notifier), it
//! plugs straight into rooms.
//!
//! # Adapters
//!
//! - [`MemoryAdapter`]: in-process pub/sub; [`Subscription`]s receive
//!   messages
//! - [`LogAdapter`]: writes messages to `tracing`, no subscriptions
//!
//! [`BroadcastConfig`] selects one, by hand or from the environment.

mod broadcaster;
mod config;
mod error;
mod logging;
mod memory;

pub use broadcaster::{Broadcaster, Subscription};
pub use config::{AdapterKind, BroadcastConfig, ADAPTER_ENV, CHANNEL_PREFIX_ENV};
pub use error::BroadcastError;
pub use logging::LogAdapter;
pub use memory::MemoryAdapter;

use tokio::sync::broadcast;

/// Moves encoded messages onto named channels.
///
/// Implementations are shared between tasks and called synchronously from
/// [`Notifier::notify`](boardgame_protocol::Notifier::notify), so
/// `publish` must not block.
pub trait BroadcastAdapter: Send + Sync + 'static {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Publishes `message` on `channel`. Returns how many subscribers
    /// received it; zero is not an error.
    fn publish(&self, channel: &str, message: Vec<u8>) -> Result<usize, BroadcastError>;

    /// Opens a receiver for `channel`.
    fn subscribe(&self, channel: &str) -> Result<broadcast::Receiver<Vec<u8>>, BroadcastError>;
}
