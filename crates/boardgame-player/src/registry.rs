//! The player registry: every known player and whether they're online.
//!
//! Games never flip connectivity themselves. Something outside the core
//! (a socket handler, a presence service) learns that a player came or
//! went and tells the registry, which flips the flag on the shared
//! `Arc<Player>`. Every roster holding that player sees the change.
//!
//! # Concurrency note
//!
//! `PlayerRegistry` is a plain `HashMap` and is not synchronized. It is
//! meant to be owned by one task or wrapped in a mutex a layer up.

use std::collections::HashMap;
use std::sync::Arc;

use boardgame_protocol::PlayerId;

use crate::{Player, PlayerError};

/// Tracks all known players by id.
///
/// ```text
/// register() ──→ [disconnected] ──connect()──→ [connected]
///                      ↑                            │
///                      └────────disconnect()────────┘
/// ```
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Arc<Player>>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new player and returns the shared handle to it.
    ///
    /// # Errors
    /// [`PlayerError::AlreadyRegistered`] if the id is taken.
    pub fn register(&mut self, player: Player) -> Result<Arc<Player>, PlayerError> {
        let id = player.key().clone();
        if self.players.contains_key(&id) {
            return Err(PlayerError::AlreadyRegistered(id));
        }
        let player = Arc::new(player);
        self.players.insert(id.clone(), Arc::clone(&player));
        tracing::info!(player_id = %id, name = player.name(), "player registered");
        Ok(player)
    }

    /// Marks a player as connected.
    ///
    /// # Errors
    /// [`PlayerError::NotFound`] if the id is unknown.
    pub fn connect(&self, id: &PlayerId) -> Result<Arc<Player>, PlayerError> {
        let player = self.lookup(id)?;
        player.connect();
        tracing::info!(player_id = %id, "player connected");
        Ok(player)
    }

    /// Marks a player as disconnected.
    ///
    /// # Errors
    /// [`PlayerError::NotFound`] if the id is unknown.
    pub fn disconnect(&self, id: &PlayerId) -> Result<Arc<Player>, PlayerError> {
        let player = self.lookup(id)?;
        player.disconnect();
        tracing::info!(player_id = %id, "player disconnected");
        Ok(player)
    }

    pub fn get(&self, id: &PlayerId) -> Option<Arc<Player>> {
        self.players.get(id).cloned()
    }

    /// Forgets a player. Rosters that still hold the `Arc` keep it alive.
    pub fn remove(&mut self, id: &PlayerId) -> Option<Arc<Player>> {
        let removed = self.players.remove(id);
        if removed.is_some() {
            tracing::info!(player_id = %id, "player removed from registry");
        }
        removed
    }

    /// All connected players, sorted by id so callers get a stable order.
    pub fn connected(&self) -> Vec<Arc<Player>> {
        let mut online: Vec<_> = self
            .players
            .values()
            .filter(|p| p.is_connected())
            .cloned()
            .collect();
        online.sort_by(|a, b| a.key().cmp(b.key()));
        online
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn lookup(&self, id: &PlayerId) -> Result<Arc<Player>, PlayerError> {
        self.players
            .get(id)
            .cloned()
            .ok_or_else(|| PlayerError::NotFound(id.clone()))
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: &str) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_register_returns_shared_handle() {
        let mut reg = PlayerRegistry::new();
        let alice = reg.register(Player::new("alice", "Alice")).unwrap();

        reg.connect(&pid("alice")).unwrap();

        // The handle returned by register sees the flag flip.
        assert!(alice.is_connected());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_register_duplicate_id_fails() {
        let mut reg = PlayerRegistry::new();
        reg.register(Player::new("alice", "Alice")).unwrap();

        let result = reg.register(Player::new("alice", "Impostor"));
        assert!(matches!(result, Err(PlayerError::AlreadyRegistered(_))));
        assert_eq!(reg.get(&pid("alice")).unwrap().name(), "Alice");
    }

    #[test]
    fn test_connect_unknown_player_fails() {
        let reg = PlayerRegistry::new();
        let result = reg.connect(&pid("ghost"));
        assert!(matches!(result, Err(PlayerError::NotFound(_))));
    }

    #[test]
    fn test_disconnect_clears_flag() {
        let mut reg = PlayerRegistry::new();
        reg.register(Player::new("bob", "Bob")).unwrap();
        reg.connect(&pid("bob")).unwrap();

        let bob = reg.disconnect(&pid("bob")).unwrap();
        assert!(!bob.is_connected());
    }

    #[test]
    fn test_connected_is_sorted_and_filtered() {
        let mut reg = PlayerRegistry::new();
        for id in ["carol", "alice", "bob"] {
            reg.register(Player::new(id, id)).unwrap();
        }
        reg.connect(&pid("carol")).unwrap();
        reg.connect(&pid("alice")).unwrap();

        let ids: Vec<_> = reg
            .connected()
            .iter()
            .map(|p| p.id().as_str().to_owned())
            .collect();
        assert_eq!(ids, ["alice", "carol"]);
    }

    #[test]
    fn test_remove_keeps_outstanding_handles_alive() {
        let mut reg = PlayerRegistry::new();
        let alice = reg.register(Player::new("alice", "Alice")).unwrap();

        assert!(reg.remove(&pid("alice")).is_some());
        assert!(reg.is_empty());
        assert_eq!(alice.name(), "Alice");
        assert!(reg.remove(&pid("alice")).is_none());
    }
}
