//! Error types for the player layer.

use boardgame_protocol::PlayerId;

/// Errors raised by the [`PlayerRegistry`](crate::PlayerRegistry).
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// No player with this id was ever registered (or it was removed).
    #[error("player {0} not found")]
    NotFound(PlayerId),

    /// A player with this id is already registered. Ids are identities, so
    /// a second registration would create two players that compare equal.
    #[error("player {0} is already registered")]
    AlreadyRegistered(PlayerId),
}
