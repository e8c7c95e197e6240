//! The `MoveRule` trait, the extension point for concrete games.
//!
//! The engine itself knows turn order and phases, nothing about boards or
//! pieces. A game variant plugs its rules in by implementing [`MoveRule`];
//! the engine calls the hooks at the right moment.

use serde::{de::DeserializeOwned, Serialize};

use crate::{Game, Move};

/// Per-variant move legality and effects.
///
/// Like a strategy object, but type-level: the hooks are associated
/// functions, and a game carries its rule as a type parameter
/// (`Game<TicTacToe>`). State that belongs to the variant lives in
/// [`Board`](Self::Board), stored on the game and reachable through
/// [`Game::board`] / [`Game::board_mut`]; anything looser can go in the
/// game's metadata.
///
/// The engine checks phase and turn before consulting the rule, so
/// `validate` only ever sees moves from the current player of a game in
/// progress.
pub trait MoveRule: Sized + Send + Sync + 'static {
    /// Variant-specific state (a grid, a deck, scores). Created with
    /// `Default` when the game is created and included in snapshots.
    type Board: Clone
        + Default
        + std::fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;

    /// Extra legality checks for a move.
    ///
    /// Return `Err(reason)` to reject; the reason ends up in the move's
    /// error message (an empty reason yields a plain "invalid move").
    /// Default: accept everything.
    fn validate(_game: &Game<Self>, _mv: &Move) -> Result<(), String> {
        Ok(())
    }

    /// Applies an accepted move to the game.
    ///
    /// Called once per accepted move, after it is marked executed and
    /// before it is appended to the history and the turn advances.
    /// Default: no-op.
    fn perform(_game: &mut Game<Self>, _mv: &Move) {}
}

/// The rule with no rules: any move from the current player is legal and
/// nothing happens when it executes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseRule;

impl MoveRule for BaseRule {
    type Board = ();
}
