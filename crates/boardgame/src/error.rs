//! Unified error type for the boardgame crates.

use boardgame_broadcast::BroadcastError;
use boardgame_game::GameError;
use boardgame_player::PlayerError;
use boardgame_protocol::ProtocolError;
use boardgame_room::RoomError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so `?`
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BoardgameError {
    /// Encoding or decoding a notification failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Unknown or duplicate player.
    #[error(transparent)]
    Player(#[from] PlayerError),

    /// A game lifecycle rule was broken (too few players, bad transition).
    #[error(transparent)]
    Game(#[from] GameError),

    /// A room-level error (not found, second game, player routing).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Broadcaster configuration or delivery.
    #[error(transparent)]
    Broadcast(#[from] BroadcastError),
}

#[cfg(test)]
mod tests {
    use boardgame_protocol::{PlayerId, RoomId};

    use super::*;

    #[test]
    fn test_from_player_error() {
        let err = PlayerError::NotFound(PlayerId::new("ghost"));
        let wrapped: BoardgameError = err.into();
        assert!(matches!(wrapped, BoardgameError::Player(_)));
        assert!(wrapped.to_string().contains("ghost"));
    }

    #[test]
    fn test_from_game_error() {
        let err = GameError::NotEnoughPlayers {
            required: 2,
            actual: 1,
        };
        let wrapped: BoardgameError = err.into();
        assert!(matches!(wrapped, BoardgameError::Game(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomId::new("r1"));
        let wrapped: BoardgameError = err.into();
        assert!(matches!(wrapped, BoardgameError::Room(_)));
        assert_eq!(wrapped.to_string(), "room r1 not found");
    }

    #[test]
    fn test_from_broadcast_error() {
        let err = BroadcastError::UnknownAdapter("redis".into());
        let wrapped: BoardgameError = err.into();
        assert!(matches!(wrapped, BoardgameError::Broadcast(_)));
        assert_eq!(wrapped.to_string(), "Unknown broadcaster adapter: redis");
    }

    #[test]
    fn test_from_protocol_error() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let wrapped: BoardgameError = ProtocolError::Decode(bad).into();
        assert!(matches!(wrapped, BoardgameError::Protocol(_)));
    }
}
