//! Room configuration.

use serde::{Deserialize, Serialize};

/// Settings for new rooms.
///
/// ```rust
/// use boardgame_room::RoomConfig;
///
/// let config = RoomConfig { max_players: 2, ..RoomConfig::default() };
/// assert_eq!(config.command_buffer, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Capacity ceiling: a room with this many players refuses joins.
    pub max_players: usize,

    /// Size of a room actor's command channel. When it fills up, senders
    /// wait.
    pub command_buffer: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_players: 4,
            command_buffer: 64,
        }
    }
}
