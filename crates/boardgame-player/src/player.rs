//! The `Player` type: identity plus a connectivity flag.
//!
//! A player is created by the caller and then shared. Games and rooms hold
//! `Arc<Player>` clones in their rosters; none of them owns the player's
//! lifecycle. Connecting and disconnecting happen elsewhere (a socket
//! handler, the [`PlayerRegistry`](crate::PlayerRegistry)), so the flag is
//! an `AtomicBool`: flipping it through any `Arc` is seen through all of
//! them.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};

use boardgame_protocol::{Metadata, PlayerId};
use serde::{Deserialize, Serialize};

/// A game participant.
///
/// # Identity
///
/// `PartialEq`, `Eq` and `Hash` look at the id and nothing else. Two
/// `Player` values with the same id are the same player even if their
/// names or metadata differ. Containers that key on players should use
/// [`Player::key`] directly.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    connected: AtomicBool,
    metadata: Metadata,
}

impl Player {
    /// Creates a disconnected player with empty metadata.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            connected: AtomicBool::new(false),
            metadata: Metadata::new(),
        }
    }

    /// Replaces the player's metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// The identity key used by rosters and registries.
    pub fn key(&self) -> &PlayerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Marks the player as connected.
    pub fn connect(&self) {
        self.connected.store(true, Ordering::Relaxed);
    }

    /// Marks the player as disconnected.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Relaxed);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// The player's public representation.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            connected: self.is_connected(),
            metadata: self.metadata.clone(),
        }
    }
}

// `AtomicBool` is not `Clone`, so this is written out by hand. The clone
// starts with the connectivity the original has right now; after that the
// two flags are independent.
impl Clone for Player {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            connected: AtomicBool::new(self.is_connected()),
            metadata: self.metadata.clone(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// The externalizable form of a [`Player`], used in notification payloads
/// and game snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub connected: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<PlayerSnapshot> for Player {
    fn from(snapshot: PlayerSnapshot) -> Self {
        let player = Player::new(snapshot.id, snapshot.name)
            .with_metadata(snapshot.metadata);
        if snapshot.connected {
            player.connect();
        }
        player
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_new_player_is_disconnected() {
        let p = Player::new("alice", "Alice");
        assert!(!p.is_connected());
        assert!(p.metadata().is_empty());
    }

    #[test]
    fn test_connect_and_disconnect() {
        let p = Player::new("alice", "Alice");
        p.connect();
        assert!(p.is_connected());
        p.disconnect();
        assert!(!p.is_connected());
    }

    #[test]
    fn test_connectivity_is_shared_through_arc() {
        let p = Arc::new(Player::new("alice", "Alice"));
        let held_by_game = Arc::clone(&p);
        p.connect();
        assert!(held_by_game.is_connected());
    }

    #[test]
    fn test_equality_is_by_id_only() {
        let mut meta = Metadata::new();
        meta.insert("color".into(), "red".into());
        let a = Player::new("p1", "Alice");
        let b = Player::new("p1", "Someone Else").with_metadata(meta);
        let c = Player::new("p2", "Alice");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_hash_is_by_id_only() {
        let mut set = HashSet::new();
        set.insert(Player::new("p1", "Alice"));
        set.insert(Player::new("p1", "Alias"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_snapshot_carries_all_public_fields() {
        let mut meta = Metadata::new();
        meta.insert("rating".into(), 1500.into());
        let p = Player::new("p1", "Alice").with_metadata(meta.clone());
        p.connect();

        let snap = p.snapshot();
        assert_eq!(snap.id, PlayerId::new("p1"));
        assert_eq!(snap.name, "Alice");
        assert!(snap.connected);
        assert_eq!(snap.metadata, meta);
    }

    #[test]
    fn test_player_from_snapshot_restores_connectivity() {
        let p = Player::new("p1", "Alice");
        p.connect();
        let restored = Player::from(p.snapshot());
        assert!(restored.is_connected());
        assert_eq!(restored.name(), "Alice");
    }
}
