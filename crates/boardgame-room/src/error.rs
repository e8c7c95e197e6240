//! Error types for the room layer.
//!
//! Only misuse lands here. Ordinary rejections (room full, game already
//! running) are `false` returns, not errors.

use boardgame_game::GameError;
use boardgame_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A room with this id is already open.
    #[error("room {0} already exists")]
    AlreadyExists(RoomId),

    /// `create_game` was called on a room that already has a game.
    #[error("game already exists in room {0}")]
    GameAlreadyExists(RoomId),

    /// A game operation was requested before `create_game`.
    #[error("no game created in room {0}")]
    NoGame(RoomId),

    /// The game refused a lifecycle transition.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The player is already in a room (this one or another).
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// A freshly opened room would not seat its own host.
    #[error("room {0} has no seat for its host")]
    HostNotSeated(RoomId),

    /// The player is not in any room.
    #[error("player {0} is not in any room")]
    NotInRoom(PlayerId),

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
