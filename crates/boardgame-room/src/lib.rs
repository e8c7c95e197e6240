//! Rooms: lobbies that host one game each.
//!
//! A [`Room`] gathers players, enforces capacity, and owns at most one
//! [`Game`](boardgame_game::Game). It announces joins, departures and game
//! starts through a [`Notifier`](boardgame_protocol::Notifier).
//!
//! Rooms are plain synchronous values. To share one between tasks, spawn
//! it as an actor: [`spawn_room`] moves the room into its own Tokio task
//! and hands back a [`RoomHandle`]; every operation becomes a command
//! processed one at a time, so two moves can never race on the same turn.
//!
//! # Key types
//!
//! - [`Room`]: the lobby aggregate
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomManager`]: creates/destroys rooms, routes players
//! - [`RoomConfig`]: capacity and actor settings
//! - [`ChatMessage`]: chat and system lines posted to a room

mod actor;
mod chat;
mod config;
mod error;
mod manager;
mod room;

pub use actor::{spawn_room, MoveOutcome, RoomHandle, RoomInfo};
pub use chat::{ChatMessage, MessageKind};
pub use config::RoomConfig;
pub use error::RoomError;
pub use manager::RoomManager;
pub use room::{Room, RoomSnapshot};
