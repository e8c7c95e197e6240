//! Chat and system messages posted to a room.

use boardgame_player::{Player, PlayerSnapshot};
use boardgame_protocol::{MessageId, RoomId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message: a player, or the room itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Chat,
    System,
}

/// A line in a room's chat. System messages have no player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub player: Option<PlayerSnapshot>,
    pub content: String,
    pub room_id: RoomId,
    #[serde(rename = "message_type")]
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A message written by `player`.
    pub fn chat(
        id: MessageId,
        player: &Player,
        content: impl Into<String>,
        room_id: RoomId,
    ) -> Self {
        Self {
            id,
            player: Some(player.snapshot()),
            content: content.into(),
            room_id,
            kind: MessageKind::Chat,
            timestamp: Utc::now(),
        }
    }

    /// A message from the room itself.
    pub fn system(id: MessageId, content: impl Into<String>, room_id: RoomId) -> Self {
        Self {
            id,
            player: None,
            content: content.into(),
            room_id,
            kind: MessageKind::System,
            timestamp: Utc::now(),
        }
    }

    /// "<name> joined the room"
    pub fn player_joined(id: MessageId, player: &Player, room_id: RoomId) -> Self {
        Self::system(id, format!("{} joined the room", player.name()), room_id)
    }

    /// "<name> left the room"
    pub fn player_left(id: MessageId, player: &Player, room_id: RoomId) -> Self {
        Self::system(id, format!("{} left the room", player.name()), room_id)
    }

    /// "Game has started!"
    pub fn game_started(id: MessageId, room_id: RoomId) -> Self {
        Self::system(id, "Game has started!", room_id)
    }

    pub fn is_system(&self) -> bool {
        self.kind == MessageKind::System
    }

    pub fn is_chat(&self) -> bool {
        self.kind == MessageKind::Chat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> RoomId {
        RoomId::new("r1")
    }

    #[test]
    fn test_chat_message_carries_player() {
        let alice = Player::new("alice", "Alice");
        let msg = ChatMessage::chat(MessageId::new("c1"), &alice, "gl hf", room());
        assert!(msg.is_chat());
        assert!(!msg.is_system());
        assert_eq!(msg.player.unwrap().name, "Alice");
    }

    #[test]
    fn test_system_message_has_no_player() {
        let msg = ChatMessage::system(MessageId::new("s1"), "maintenance", room());
        assert!(msg.is_system());
        assert!(msg.player.is_none());
    }

    #[test]
    fn test_canned_system_messages() {
        let bob = Player::new("bob", "Bob");
        assert_eq!(
            ChatMessage::player_joined(MessageId::new("1"), &bob, room()).content,
            "Bob joined the room"
        );
        assert_eq!(
            ChatMessage::player_left(MessageId::new("2"), &bob, room()).content,
            "Bob left the room"
        );
        assert_eq!(
            ChatMessage::game_started(MessageId::new("3"), room()).content,
            "Game has started!"
        );
    }

    #[test]
    fn test_chat_message_json_uses_message_type_key() {
        let msg = ChatMessage::system(MessageId::new("s1"), "hi", room());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["message_type"], "system");
        assert_eq!(json["room_id"], "r1");
        assert!(json["player"].is_null());
    }
}
