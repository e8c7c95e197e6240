//! Shared vocabulary for board game sessions.
//!
//! Every other crate in the workspace speaks in terms of the types defined
//! here:
//!
//! - **Identifiers** ([`PlayerId`], [`RoomId`], [`GameId`], [`MoveId`],
//!   [`MessageId`]): string newtypes so ids from any external system can be
//!   used as-is.
//! - **Notifications** ([`Topic`], [`Event`], [`Notification`]): what the
//!   session core announces and where it goes.
//! - **The sink** ([`Notifier`]): the one seam between the state machine
//!   and whatever delivers events to listeners.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how notifications become
//!   bytes on a channel and back.
//!
//! # Architecture
//!
//! ```text
//! Room / Game (core) ──notify──→ Notifier ──encode──→ channel (bytes)
//! ```
//!
//! This crate knows nothing about players, games, or rooms beyond their ids.

mod codec;
mod error;
mod notify;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use notify::{NullNotifier, Notifier, RecordingNotifier, Sent};
pub use types::{
    Event, GameId, MessageId, Metadata, MoveId, Notification, PlayerId,
    RoomId, Topic,
};
