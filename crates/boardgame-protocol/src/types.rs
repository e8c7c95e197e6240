//! Identifier, topic, and notification types.
//!
//! These are the values that cross the boundary between the session core
//! and its listeners, so every one of them is serializable.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An open key-value bag. The core stores it and hands it back; it never
/// looks inside.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Declares a string-backed identifier newtype.
///
/// Ids are supplied by the caller (a user table, a lobby service, ...), so
/// they wrap `String` rather than a counter. `#[serde(transparent)]` keeps
/// the JSON form a bare string: `PlayerId("alice")` becomes `"alice"`.
macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Creates an id from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// Stable identity of a player. Two players with the same id are the
    /// same player, whatever their names or metadata say.
    PlayerId
}

string_id! {
    /// Identifier of a room (a lobby).
    RoomId
}

string_id! {
    /// Identifier of a game. Rooms derive it from their own id.
    GameId
}

string_id! {
    /// Identifier of a single move attempt.
    MoveId
}

string_id! {
    /// Identifier of a chat or system message.
    MessageId
}

impl GameId {
    /// The id a room gives to the game it hosts: `"<room id>_game"`.
    pub fn for_room(room_id: &RoomId) -> Self {
        Self(format!("{room_id}_game"))
    }
}

impl MoveId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(random_hex())
    }
}

impl MessageId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(random_hex())
    }
}

/// 8 random bytes rendered as 16 lowercase hex characters.
fn random_hex() -> String {
    let bytes: [u8; 8] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Topic: where a notification is addressed
// ---------------------------------------------------------------------------

/// The addressee of a notification: a room, a single player, or a game.
///
/// Serialized adjacently tagged, e.g. `{"kind": "room", "id": "lobby-1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Topic {
    Room(RoomId),
    Player(PlayerId),
    Game(GameId),
}

impl Topic {
    /// The topic family: `"room"`, `"player"` or `"game"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Room(_) => "room",
            Self::Player(_) => "player",
            Self::Game(_) => "game",
        }
    }

    /// The id of the addressed entity.
    pub fn id(&self) -> &str {
        match self {
            Self::Room(id) => id.as_str(),
            Self::Player(id) => id.as_str(),
            Self::Game(id) => id.as_str(),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

// ---------------------------------------------------------------------------
// Event: what happened
// ---------------------------------------------------------------------------

/// The state changes the session core announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A player entered a room. Payload: the player's snapshot.
    PlayerJoined,
    /// A player left a room. Payload: the player's snapshot.
    PlayerLeft,
    /// A room's game moved to playing. Payload: the game snapshot.
    GameStarted,
    /// A room's game was ended. Payload: the game snapshot.
    GameEnded,
    /// A move was accepted. Payload: the move snapshot.
    MoveExecuted,
    /// Someone (or the system) posted to the room chat.
    ChatMessage,
}

impl Event {
    /// The wire name of the event, e.g. `"player_joined"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayerJoined => "player_joined",
            Self::PlayerLeft => "player_left",
            Self::GameStarted => "game_started",
            Self::GameEnded => "game_ended",
            Self::MoveExecuted => "move_executed",
            Self::ChatMessage => "chat_message",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Notification: the message a listener receives
// ---------------------------------------------------------------------------

/// An event, its payload, and when it was built.
///
/// This is what gets encoded and published on a channel. The topic is not
/// part of it: the channel a notification arrives on already says that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub event: Event,
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Builds a notification stamped with the current time.
    pub fn new(event: Event, data: serde_json::Value) -> Self {
        Self {
            event,
            data,
            timestamp: Utc::now(),
        }
    }
}
