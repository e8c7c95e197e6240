//! The broadcaster: notifications in, encoded bytes out on named channels.

use std::sync::Arc;

use boardgame_protocol::{
    Codec, Event, GameId, JsonCodec, Notification, Notifier, PlayerId, RoomId, Topic,
};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::{
    AdapterKind, BroadcastAdapter, BroadcastConfig, BroadcastError, LogAdapter, MemoryAdapter,
};

/// Publishes [`Notification`]s for rooms, players, and games.
///
/// Each topic maps to one channel, `<prefix>:<kind>:<id>`. The broadcaster
/// stamps the event and payload into a notification, encodes it with its
/// codec, and hands the bytes to its adapter.
///
/// It also implements [`Notifier`], so a room can announce straight into
/// it.
pub struct Broadcaster<C: Codec = JsonCodec> {
    adapter: Arc<dyn BroadcastAdapter>,
    codec: C,
    channel_prefix: String,
}

impl Broadcaster<JsonCodec> {
    /// A JSON broadcaster over `adapter`.
    pub fn new(adapter: impl BroadcastAdapter, channel_prefix: impl Into<String>) -> Self {
        Self::with_codec(adapter, JsonCodec, channel_prefix)
    }

    /// Builds the adapter `config` names.
    pub fn from_config(config: &BroadcastConfig) -> Self {
        tracing::info!(
            adapter = %config.adapter,
            prefix = %config.channel_prefix,
            "broadcaster configured"
        );
        match config.adapter {
            AdapterKind::Memory => Self::new(
                MemoryAdapter::new(config.capacity),
                config.channel_prefix.clone(),
            ),
            AdapterKind::Log => Self::new(LogAdapter, config.channel_prefix.clone()),
        }
    }
}

impl<C: Codec> Broadcaster<C> {
    pub fn with_codec(
        adapter: impl BroadcastAdapter,
        codec: C,
        channel_prefix: impl Into<String>,
    ) -> Self {
        Self {
            adapter: Arc::new(adapter),
            codec,
            channel_prefix: channel_prefix.into(),
        }
    }

    pub fn adapter_name(&self) -> &'static str {
        self.adapter.name()
    }

    pub fn channel_prefix(&self) -> &str {
        &self.channel_prefix
    }

    /// The channel a topic is published on, e.g. `board_game_core:room:r1`.
    pub fn channel(&self, topic: &Topic) -> String {
        format!("{}:{}:{}", self.channel_prefix, topic.kind(), topic.id())
    }

    /// Publishes `event` with `data` to `topic`. Returns how many
    /// subscribers received it.
    pub fn publish(
        &self,
        topic: &Topic,
        event: Event,
        data: serde_json::Value,
    ) -> Result<usize, BroadcastError> {
        let notification = Notification::new(event, data);
        let bytes = self.codec.encode(&notification)?;
        let channel = self.channel(topic);
        let receivers = self.adapter.publish(&channel, bytes)?;
        tracing::debug!(%channel, %event, receivers, "notification published");
        Ok(receivers)
    }

    pub fn broadcast_to_room(
        &self,
        room_id: &RoomId,
        event: Event,
        data: serde_json::Value,
    ) -> Result<usize, BroadcastError> {
        self.publish(&Topic::Room(room_id.clone()), event, data)
    }

    pub fn broadcast_to_player(
        &self,
        player_id: &PlayerId,
        event: Event,
        data: serde_json::Value,
    ) -> Result<usize, BroadcastError> {
        self.publish(&Topic::Player(player_id.clone()), event, data)
    }

    pub fn broadcast_to_game(
        &self,
        game_id: &GameId,
        event: Event,
        data: serde_json::Value,
    ) -> Result<usize, BroadcastError> {
        self.publish(&Topic::Game(game_id.clone()), event, data)
    }
}

impl<C: Codec + Clone> Broadcaster<C> {
    /// Subscribes to everything published on `topic` from now on.
    ///
    /// # Errors
    /// [`BroadcastError::SubscribeUnsupported`] if the adapter cannot
    /// deliver in-process.
    pub fn subscribe(&self, topic: &Topic) -> Result<Subscription<C>, BroadcastError> {
        let channel = self.channel(topic);
        let receiver = self.adapter.subscribe(&channel)?;
        Ok(Subscription {
            channel,
            receiver,
            codec: self.codec.clone(),
        })
    }

    pub fn subscribe_to_room(&self, room_id: &RoomId) -> Result<Subscription<C>, BroadcastError> {
        self.subscribe(&Topic::Room(room_id.clone()))
    }

    pub fn subscribe_to_player(
        &self,
        player_id: &PlayerId,
    ) -> Result<Subscription<C>, BroadcastError> {
        self.subscribe(&Topic::Player(player_id.clone()))
    }

    pub fn subscribe_to_game(&self, game_id: &GameId) -> Result<Subscription<C>, BroadcastError> {
        self.subscribe(&Topic::Game(game_id.clone()))
    }
}

impl<C: Codec> Notifier for Broadcaster<C> {
    fn notify(&self, topic: Topic, event: Event, payload: serde_json::Value) {
        if let Err(e) = self.publish(&topic, event, payload) {
            tracing::warn!(%topic, %event, error = %e, "broadcast failed");
        }
    }
}

/// The receiving end of one channel. Decodes each message back into a
/// [`Notification`].
#[derive(Debug)]
pub struct Subscription<C: Codec = JsonCodec> {
    channel: String,
    receiver: broadcast::Receiver<Vec<u8>>,
    codec: C,
}

impl<C: Codec> Subscription<C> {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Waits for the next notification.
    ///
    /// # Errors
    /// - [`BroadcastError::Lagged`] if messages were skipped; the next
    ///   call resumes with the oldest one still buffered
    /// - [`BroadcastError::Closed`] once the channel is gone
    /// - [`BroadcastError::Protocol`] for a message that does not decode
    pub async fn recv(&mut self) -> Result<Notification, BroadcastError> {
        match self.receiver.recv().await {
            Ok(bytes) => Ok(self.codec.decode(&bytes)?),
            Err(RecvError::Lagged(skipped)) => Err(BroadcastError::Lagged(skipped)),
            Err(RecvError::Closed) => Err(BroadcastError::Closed),
        }
    }

    /// Returns the next notification if one is already buffered.
    pub fn try_recv(&mut self) -> Result<Option<Notification>, BroadcastError> {
        match self.receiver.try_recv() {
            Ok(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Lagged(skipped)) => Err(BroadcastError::Lagged(skipped)),
            Err(TryRecvError::Closed) => Err(BroadcastError::Closed),
        }
    }

    /// Drains everything currently buffered, skipping over lag.
    pub fn drain(&mut self) -> Result<Vec<Notification>, BroadcastError> {
        let mut out = Vec::new();
        loop {
            match self.try_recv() {
                Ok(Some(n)) => out.push(n),
                Ok(None) | Err(BroadcastError::Closed) => return Ok(out),
                Err(BroadcastError::Lagged(skipped)) => {
                    tracing::warn!(channel = %self.channel, skipped, "subscription lagged");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
