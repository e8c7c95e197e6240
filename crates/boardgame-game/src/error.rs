//! Error types for the game layer.
//!
//! Two tiers live here. [`GameError`] is for caller misuse (starting a game
//! that can't start) and comes back as `Err`. [`MoveRejection`] is the
//! ordinary "not now" outcome of a move; it is never returned as an error,
//! only rendered into the move's `error_message`.

use crate::GameState;

/// Misuse of the game lifecycle. Raised before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// `start` was called with too few players on the roster.
    #[error("not enough players to start game: need {required}, have {actual}")]
    NotEnoughPlayers { required: usize, actual: usize },

    /// The requested transition goes backwards or skips a state.
    #[error("cannot move game from {from} to {to}")]
    InvalidTransition { from: GameState, to: GameState },

    /// A snapshot could not be turned back into a game.
    #[error("invalid game snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Why a move was not executed, in the order the causes are checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    #[error("game is not currently playing")]
    NotPlaying,

    #[error("it is not {player}'s turn")]
    NotYourTurn { player: String },

    /// The game's rule refused the move without saying why.
    #[error("invalid move")]
    Invalid,

    /// The game's rule refused the move with a reason.
    #[error("invalid move: {0}")]
    Illegal(String),
}
