//! Room manager: creates, tracks, and routes players to rooms.

use std::collections::HashMap;
use std::sync::Arc;

use boardgame_game::{BaseRule, Move, MoveRule};
use boardgame_player::Player;
use boardgame_protocol::{Notifier, PlayerId, RoomId};

use crate::{spawn_room, MoveOutcome, Room, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Manages all active rooms and tracks which player is in which room.
///
/// Every room is spawned as an actor sharing the manager's notifier.
/// A player can be in at most one room at a time.
pub struct RoomManager<R: MoveRule = BaseRule> {
    /// Active rooms, keyed by room id.
    rooms: HashMap<RoomId, RoomHandle<R>>,

    /// Maps each player to the room they're currently in.
    player_rooms: HashMap<PlayerId, RoomId>,

    notifier: Arc<dyn Notifier>,
    config: RoomConfig,
    next_room: u64,
}

impl<R: MoveRule> RoomManager<R> {
    /// Creates an empty manager. New rooms get `config`'s capacity and
    /// announce through `notifier`.
    pub fn new(notifier: Arc<dyn Notifier>, config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            notifier,
            config,
            next_room: 1,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Opens a room with a generated id (`room-1`, `room-2`, ...) and
    /// returns that id.
    ///
    /// The host is recorded on the room but not joined; joining is a
    /// separate step, as for everybody else.
    pub fn create_room(&mut self, name: impl Into<String>, host: Arc<Player>) -> RoomId {
        let mut room_id = self.generate_id();
        while self.rooms.contains_key(&room_id) {
            room_id = self.generate_id();
        }
        self.open(room_id.clone(), name.into(), host);
        room_id
    }

    /// Opens a room under a caller-chosen id.
    ///
    /// # Errors
    /// [`RoomError::AlreadyExists`] if a room with that id is open.
    pub fn create_room_with_id(
        &mut self,
        room_id: impl Into<RoomId>,
        name: impl Into<String>,
        host: Arc<Player>,
    ) -> Result<RoomHandle<R>, RoomError> {
        let room_id = room_id.into();
        if self.rooms.contains_key(&room_id) {
            return Err(RoomError::AlreadyExists(room_id));
        }
        Ok(self.open(room_id, name.into(), host))
    }

    fn open(&mut self, room_id: RoomId, name: String, host: Arc<Player>) -> RoomHandle<R> {
        let room = Room::new(room_id.clone(), name, host, Arc::clone(&self.notifier))
            .with_max_players(self.config.max_players);
        let handle = spawn_room(room, self.config.command_buffer);
        self.rooms.insert(room_id.clone(), handle.clone());
        tracing::info!(%room_id, max_players = self.config.max_players, "room created");
        handle
    }

    fn generate_id(&mut self) -> RoomId {
        let id = RoomId::new(format!("room-{}", self.next_room));
        self.next_room += 1;
        id
    }

    /// The handle of an open room.
    pub fn handle(&self, room_id: &RoomId) -> Result<&RoomHandle<R>, RoomError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    /// Adds a player to a room.
    ///
    /// Returns `Ok(false)` when the room refuses (full, or its game is
    /// playing); the player stays roomless in that case.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] if the player is in a room already
    /// - [`RoomError::NotFound`] for an unknown room
    pub async fn join_room(
        &mut self,
        player: Arc<Player>,
        room_id: &RoomId,
    ) -> Result<bool, RoomError> {
        if let Some(current) = self.player_rooms.get(player.id()) {
            return Err(RoomError::AlreadyInRoom(
                player.id().clone(),
                current.clone(),
            ));
        }

        let handle = self.handle(room_id)?;
        let player_id = player.id().clone();
        let joined = handle.add_player(player).await?;
        if joined {
            self.player_rooms.insert(player_id, room_id.clone());
        }
        Ok(joined)
    }

    /// Removes a player from their current room.
    ///
    /// Returns `Ok(false)` if the room refuses (its game is playing); the
    /// player stays in the room.
    ///
    /// # Errors
    /// [`RoomError::NotInRoom`] if the player is not in any room.
    pub async fn leave_room(&mut self, player: &Arc<Player>) -> Result<bool, RoomError> {
        let room_id = self
            .player_rooms
            .get(player.id())
            .cloned()
            .ok_or_else(|| RoomError::NotInRoom(player.id().clone()))?;

        let left = match self.rooms.get(&room_id) {
            Some(handle) => handle.remove_player(Arc::clone(player)).await?,
            None => true,
        };
        if left {
            self.player_rooms.remove(player.id());
        }
        Ok(left)
    }

    /// Routes a move to the room its player is in.
    ///
    /// # Errors
    /// [`RoomError::NotInRoom`] if the move's player is not in any room.
    pub async fn submit_move(&self, mv: Move) -> Result<MoveOutcome, RoomError> {
        let room_id = self
            .player_rooms
            .get(mv.player().id())
            .ok_or_else(|| RoomError::NotInRoom(mv.player().id().clone()))?;
        self.handle(room_id)?.submit_move(mv).await
    }

    /// Returns info about a specific room.
    pub async fn get_room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        self.handle(room_id)?.info().await
    }

    /// Lists the rooms a player could join right now, ordered by id.
    ///
    /// Rooms that fail to respond (e.g. shutting down) are skipped.
    pub async fn list_rooms(&self) -> Vec<RoomInfo> {
        let mut infos = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.info().await {
                if info.is_joinable() {
                    infos.push(info);
                }
            }
        }
        infos.sort_by(|a, b| a.room_id.as_str().cmp(b.room_id.as_str()));
        infos
    }

    /// Shuts down a room and forgets every player that was in it.
    pub async fn destroy_room(&mut self, room_id: &RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        // An actor that is already gone needs no shutdown.
        let _ = handle.shutdown().await;
        self.player_rooms.retain(|_, rid| rid != room_id);

        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Returns the room a player is currently in, if any.
    pub fn player_room(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(player_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all open room ids.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }
}
