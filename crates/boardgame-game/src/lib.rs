//! The game state machine.
//!
//! A [`Game`] holds an ordered roster, a rotating turn index, and an
//! append-only move history. Players submit [`Move`]s; the game checks the
//! phase and the turn, asks its [`MoveRule`] whether the move is legal,
//! records it, and passes the turn.
//!
//! # Key types
//!
//! - [`Game`]: roster, turn order, history, lifecycle
//! - [`GameState`]: `waiting → playing → finished`
//! - [`Move`]: one action attempt and its outcome
//! - [`MoveRule`]: the extension point concrete games implement
//! - [`GameSnapshot`] / [`MoveSnapshot`]: externalizable representations

mod error;
mod game;
mod moves;
mod rule;
mod snapshot;
mod state;

pub use error::{GameError, MoveRejection};
pub use game::{Game, MIN_PLAYERS};
pub use moves::{Move, MoveStatus};
pub use rule::{BaseRule, MoveRule};
pub use snapshot::{GameSnapshot, MoveSnapshot};
pub use state::GameState;
