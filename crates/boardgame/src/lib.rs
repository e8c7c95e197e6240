//! # Boardgame
//!
//! Session core for turn-based multiplayer board games.
//!
//! Game developers implement a single [`MoveRule`](boardgame_game::MoveRule)
//! for their game; the crates below handle players, turn order, rooms,
//! and broadcasting every state change.
//!
//! ```text
//! Lobby ──→ RoomManager ──→ room actors ──→ Room ──→ Game ──→ MoveRule
//!                                             │
//!                                             └─notify─→ Broadcaster ──→ channels
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use boardgame::prelude::*;
//!
//! # async fn run() -> Result<(), BoardgameError> {
//! boardgame::init_tracing();
//! let lobby: Lobby = Lobby::builder().build();
//!
//! lobby.register_player("alice", "Alice").await?;
//! lobby.register_player("bob", "Bob").await?;
//! let room = lobby.open_room("friday", &PlayerId::new("alice")).await?;
//! lobby.join_room(&PlayerId::new("bob"), &room).await?;
//! lobby.start_game(&room).await?;
//!
//! let outcome = lobby
//!     .submit_move(&PlayerId::new("alice"), serde_json::json!({"cell": 4}))
//!     .await?;
//! assert!(outcome.accepted);
//! # Ok(())
//! # }
//! ```

mod error;
mod lobby;

pub use error::BoardgameError;
pub use lobby::{Lobby, LobbyBuilder};

pub use boardgame_broadcast as broadcast;
pub use boardgame_game as game;
pub use boardgame_player as player;
pub use boardgame_protocol as protocol;
pub use boardgame_room as room;

/// Installs a `tracing` subscriber that prints to stderr.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. Calling it more
/// than once is harmless; only the first call installs anything.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// Everything needed to write a game and run it in a lobby.
pub mod prelude {
    pub use crate::{BoardgameError, Lobby, LobbyBuilder};
    pub use boardgame_broadcast::{
        AdapterKind, BroadcastConfig, Broadcaster, MemoryAdapter, Subscription,
    };
    pub use boardgame_game::{
        BaseRule, Game, GameSnapshot, GameState, Move, MoveRule, MoveStatus,
    };
    pub use boardgame_player::{Player, PlayerSnapshot};
    pub use boardgame_protocol::{
        Event, GameId, Metadata, Notification, PlayerId, RoomId, Topic,
    };
    pub use boardgame_room::{
        ChatMessage, MoveOutcome, RoomConfig, RoomHandle, RoomInfo,
    };
}
