//! An ordered, id-keyed list of players.

use std::collections::HashSet;
use std::sync::Arc;

use boardgame_protocol::PlayerId;

use crate::{Player, PlayerSnapshot};

/// Players in turn order, with set semantics on identity.
///
/// Order matters (it is the turn order) so the players live in a `Vec`;
/// membership is answered from a `HashSet` of [`Player::key`]s kept in
/// sync with it. Adding a player whose id is already present is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Arc<Player>>,
    ids: HashSet<PlayerId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `player` unless a player with the same id is present.
    ///
    /// Returns `true` if the roster grew.
    pub fn insert(&mut self, player: Arc<Player>) -> bool {
        if !self.ids.insert(player.key().clone()) {
            return false;
        }
        self.players.push(player);
        true
    }

    /// Removes the player with this id, returning it if it was present.
    /// The relative order of the remaining players is kept.
    pub fn remove(&mut self, id: &PlayerId) -> Option<Arc<Player>> {
        if !self.ids.remove(id) {
            return None;
        }
        let pos = self.position(id)?;
        Some(self.players.remove(pos))
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.ids.contains(id)
    }

    /// Turn-order position of the player with this id.
    pub fn position(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.key() == id)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Player>> {
        self.players.get(index)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Player>> {
        self.players.iter()
    }

    pub fn as_slice(&self) -> &[Arc<Player>] {
        &self.players
    }

    /// The players whose connectivity flag is currently set, in order.
    pub fn connected(&self) -> Vec<Arc<Player>> {
        self.players
            .iter()
            .filter(|p| p.is_connected())
            .cloned()
            .collect()
    }

    pub fn snapshots(&self) -> Vec<PlayerSnapshot> {
        self.players.iter().map(|p| p.snapshot()).collect()
    }
}

impl FromIterator<Arc<Player>> for Roster {
    fn from_iter<I: IntoIterator<Item = Arc<Player>>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for player in iter {
            roster.insert(player);
        }
        roster
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Arc<Player>;
    type IntoIter = std::slice::Iter<'a, Arc<Player>>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}
