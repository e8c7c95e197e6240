//! `Lobby` builder and the operations that tie the layers together.
//!
//! A lobby owns the player registry, the room manager, and the broadcaster
//! every room announces through. It is the entry point for an embedding
//! server: register players, open tables, route moves.

use std::sync::Arc;

use boardgame_broadcast::{BroadcastConfig, Broadcaster};
use boardgame_game::{BaseRule, Move, MoveRule};
use boardgame_player::{Player, PlayerError, PlayerRegistry};
use boardgame_protocol::{Metadata, Notifier, PlayerId, RoomId};
use boardgame_room::{ChatMessage, MoveOutcome, RoomConfig, RoomError, RoomHandle, RoomInfo, RoomManager};
use tokio::sync::Mutex;

use crate::BoardgameError;

/// Builder for a [`Lobby`].
///
/// # Example
///
/// ```rust
/// use boardgame::prelude::*;
///
/// let lobby: Lobby = Lobby::builder()
///     .room_config(RoomConfig { max_players: 2, ..RoomConfig::default() })
///     .build();
/// assert_eq!(lobby.broadcaster().adapter_name(), "memory");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LobbyBuilder {
    room_config: RoomConfig,
    broadcast_config: BroadcastConfig,
}

impl LobbyBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration every new room gets.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the broadcaster configuration.
    pub fn broadcast_config(mut self, config: BroadcastConfig) -> Self {
        self.broadcast_config = config;
        self
    }

    /// Reads the broadcaster configuration from the environment.
    ///
    /// # Errors
    /// [`BoardgameError::Broadcast`] for an unknown adapter name.
    pub fn broadcast_from_env(mut self) -> Result<Self, BoardgameError> {
        self.broadcast_config = BroadcastConfig::from_env()?;
        Ok(self)
    }

    /// Builds the lobby. Games in its rooms follow `R`.
    pub fn build<R: MoveRule>(self) -> Lobby<R> {
        let broadcaster = Arc::new(Broadcaster::from_config(&self.broadcast_config));
        let notifier: Arc<dyn Notifier> = Arc::clone(&broadcaster) as Arc<dyn Notifier>;
        tracing::info!(
            max_players = self.room_config.max_players,
            adapter = %self.broadcast_config.adapter,
            "lobby ready"
        );
        Lobby {
            players: Mutex::new(PlayerRegistry::new()),
            rooms: Mutex::new(RoomManager::new(notifier, self.room_config)),
            broadcaster,
        }
    }
}

/// Players, rooms, and a broadcaster behind one async API.
///
/// Share it between tasks with `Arc<Lobby<R>>`; every method takes `&self`.
pub struct Lobby<R: MoveRule = BaseRule> {
    players: Mutex<PlayerRegistry>,
    rooms: Mutex<RoomManager<R>>,
    broadcaster: Arc<Broadcaster>,
}

impl Lobby<BaseRule> {
    /// Creates a new builder.
    pub fn builder() -> LobbyBuilder {
        LobbyBuilder::new()
    }
}

impl<R: MoveRule> Lobby<R> {
    /// The broadcaster rooms announce through. Subscribe here to follow a
    /// room, a player, or a game.
    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    /// Registers a new, disconnected player.
    pub async fn register_player(
        &self,
        id: impl Into<PlayerId>,
        name: impl Into<String>,
    ) -> Result<Arc<Player>, BoardgameError> {
        let player = Player::new(id, name);
        Ok(self.players.lock().await.register(player)?)
    }

    pub async fn player(&self, id: &PlayerId) -> Option<Arc<Player>> {
        self.players.lock().await.get(id)
    }

    /// Marks a player connected. Every room and game holding them sees it.
    pub async fn connect_player(&self, id: &PlayerId) -> Result<Arc<Player>, BoardgameError> {
        Ok(self.players.lock().await.connect(id)?)
    }

    pub async fn disconnect_player(&self, id: &PlayerId) -> Result<Arc<Player>, BoardgameError> {
        Ok(self.players.lock().await.disconnect(id)?)
    }

    async fn lookup(&self, id: &PlayerId) -> Result<Arc<Player>, BoardgameError> {
        self.player(id)
            .await
            .ok_or_else(|| PlayerError::NotFound(id.clone()).into())
    }

    // -----------------------------------------------------------------------
    // Rooms
    // -----------------------------------------------------------------------

    /// Opens a table: a room with a fresh waiting game, the host seated.
    ///
    /// # Errors
    /// - [`PlayerError::NotFound`] for an unregistered host
    /// - [`RoomError::AlreadyInRoom`] if the host is seated elsewhere
    /// - [`RoomError::HostNotSeated`] if the room configuration leaves no
    ///   seat for the host; the room is closed again
    pub async fn open_room(
        &self,
        name: impl Into<String>,
        host: &PlayerId,
    ) -> Result<RoomId, BoardgameError> {
        let host = self.lookup(host).await?;
        let mut rooms = self.rooms.lock().await;
        if let Some(current) = rooms.player_room(host.id()) {
            return Err(RoomError::AlreadyInRoom(host.id().clone(), current.clone()).into());
        }

        let room_id = rooms.create_room(name, Arc::clone(&host));
        rooms.handle(&room_id)?.create_game(Metadata::new()).await?;
        if !rooms.join_room(host, &room_id).await? {
            rooms.destroy_room(&room_id).await?;
            return Err(RoomError::HostNotSeated(room_id).into());
        }
        Ok(room_id)
    }

    /// Seats a player in a room. `Ok(false)` if the room is full or its
    /// game already started.
    pub async fn join_room(
        &self,
        player: &PlayerId,
        room_id: &RoomId,
    ) -> Result<bool, BoardgameError> {
        let player = self.lookup(player).await?;
        Ok(self.rooms.lock().await.join_room(player, room_id).await?)
    }

    /// Takes a player out of their room. `Ok(false)` while their game is
    /// playing.
    pub async fn leave_room(&self, player: &PlayerId) -> Result<bool, BoardgameError> {
        let player = self.lookup(player).await?;
        Ok(self.rooms.lock().await.leave_room(&player).await?)
    }

    /// Starts the game in a room.
    pub async fn start_game(&self, room_id: &RoomId) -> Result<(), BoardgameError> {
        let handle = self.room(room_id).await?;
        Ok(handle.start_game().await?)
    }

    /// Builds a move for `player` from `data` and routes it to their room.
    pub async fn submit_move(
        &self,
        player: &PlayerId,
        data: serde_json::Value,
    ) -> Result<MoveOutcome, BoardgameError> {
        let player = self.lookup(player).await?;
        let handle = self.seated_room(&player).await?;
        Ok(handle.submit_move(Move::new(player, data)).await?)
    }

    /// Posts to the chat of the player's room.
    pub async fn chat(
        &self,
        player: &PlayerId,
        content: impl Into<String>,
    ) -> Result<ChatMessage, BoardgameError> {
        let player = self.lookup(player).await?;
        let handle = self.seated_room(&player).await?;
        Ok(handle.post_chat(player, content).await?)
    }

    /// The handle of the player's room. The manager lock is released
    /// before the caller talks to the room actor.
    async fn seated_room(&self, player: &Player) -> Result<RoomHandle<R>, BoardgameError> {
        let rooms = self.rooms.lock().await;
        let room_id = rooms
            .player_room(player.id())
            .ok_or_else(|| RoomError::NotInRoom(player.id().clone()))?;
        Ok(rooms.handle(room_id)?.clone())
    }

    /// A handle to a room, for operations the lobby does not wrap.
    pub async fn room(&self, room_id: &RoomId) -> Result<RoomHandle<R>, BoardgameError> {
        Ok(self.rooms.lock().await.handle(room_id)?.clone())
    }

    /// The room a player is seated in.
    pub async fn player_room(&self, player: &PlayerId) -> Option<RoomId> {
        self.rooms.lock().await.player_room(player).cloned()
    }

    /// Rooms a player could join right now.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        self.rooms.lock().await.list_rooms().await
    }

    /// Shuts a room down and unseats everyone in it.
    pub async fn close_room(&self, room_id: &RoomId) -> Result<(), BoardgameError> {
        Ok(self.rooms.lock().await.destroy_room(room_id).await?)
    }
}
