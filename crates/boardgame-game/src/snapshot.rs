//! Externalizable representations of games and moves.
//!
//! Snapshots are what leave the process: notification payloads, API
//! responses, debug dumps. They are plain serde structs so their JSON form
//! round-trips without loss.

use boardgame_player::PlayerSnapshot;
use boardgame_protocol::{GameId, Metadata, MoveId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameState, MoveStatus};

/// Everything public about a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSnapshot {
    pub id: MoveId,
    pub player: PlayerSnapshot,
    pub data: serde_json::Value,
    pub status: MoveStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Everything public about a game, including its rule's board.
///
/// `current_player` is derived (it is `players[current_player_index]`
/// while playing, `None` otherwise) but included so listeners don't have
/// to re-derive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot<B = ()> {
    pub id: GameId,
    pub state: GameState,
    pub players: Vec<PlayerSnapshot>,
    pub current_player_index: usize,
    pub current_player: Option<PlayerSnapshot>,
    pub metadata: Metadata,
    pub moves: Vec<MoveSnapshot>,
    pub board: B,
}
