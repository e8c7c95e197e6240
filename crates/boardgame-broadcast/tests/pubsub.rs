//! Integration tests: rooms announcing through a broadcaster.

use std::sync::Arc;
use std::time::Duration;

use boardgame_broadcast::{BroadcastConfig, BroadcastError, Broadcaster, MemoryAdapter};
use boardgame_game::Move;
use boardgame_player::Player;
use boardgame_protocol::{Event, GameId, Metadata, RoomId};
use boardgame_room::{Room, spawn_room};
use serde_json::json;

fn player(id: &str, name: &str) -> Arc<Player> {
    let p = Arc::new(Player::new(id, name));
    p.connect();
    p
}

// =========================================================================
// Subscriptions
// =========================================================================

#[tokio::test]
async fn test_subscriber_receives_room_events_in_order() {
    let broadcaster = Arc::new(Broadcaster::from_config(&BroadcastConfig::default()));
    let mut sub = broadcaster.subscribe_to_room(&RoomId::new("r1")).unwrap();

    let mut room: Room = Room::new("r1", "table", player("alice", "Alice"), broadcaster.clone());
    room.create_game(Metadata::new()).unwrap();
    room.add_player(player("alice", "Alice"));
    room.add_player(player("bob", "Bob"));
    room.start_game().unwrap();

    let joined = sub.recv().await.unwrap();
    assert_eq!(joined.event, Event::PlayerJoined);
    assert_eq!(joined.data["name"], "Alice");
    assert_eq!(sub.recv().await.unwrap().event, Event::PlayerJoined);

    let started = sub.recv().await.unwrap();
    assert_eq!(started.event, Event::GameStarted);
    assert_eq!(started.data["state"], "playing");
}

#[tokio::test]
async fn test_moves_go_to_the_game_channel_only() {
    let broadcaster = Arc::new(Broadcaster::new(MemoryAdapter::default(), "t"));
    let mut room_sub = broadcaster.subscribe_to_room(&RoomId::new("r1")).unwrap();
    let mut game_sub = broadcaster.subscribe_to_game(&GameId::new("r1_game")).unwrap();

    let alice = player("alice", "Alice");
    let mut room: Room = Room::new("r1", "table", Arc::clone(&alice), broadcaster.clone());
    room.create_game(Metadata::new()).unwrap();
    room.add_player(Arc::clone(&alice));
    room.add_player(player("bob", "Bob"));
    room.start_game().unwrap();
    room_sub.drain().unwrap();

    let mut mv = Move::with_id("m1", alice, json!({"cell": 0}));
    assert!(room.process_move(&mut mv));

    let executed = game_sub.recv().await.unwrap();
    assert_eq!(executed.event, Event::MoveExecuted);
    assert_eq!(executed.data["id"], "m1");
    assert!(room_sub.try_recv().unwrap().is_none());
}

#[tokio::test]
async fn test_actor_room_publishes_to_waiting_subscriber() {
    let broadcaster = Arc::new(Broadcaster::new(MemoryAdapter::default(), "t"));
    let mut sub = broadcaster.subscribe_to_room(&RoomId::new("r9")).unwrap();

    let room: Room = Room::new("r9", "async", player("h", "Host"), broadcaster.clone());
    let handle = spawn_room(room, 8);

    let waiter = tokio::spawn(async move { sub.recv().await });
    handle.post_chat(player("h", "Host"), "anyone?").await.unwrap();

    let got = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(got.event, Event::ChatMessage);
    assert_eq!(got.data["content"], "anyone?");
}

#[tokio::test]
async fn test_slow_subscriber_reports_lag() {
    let broadcaster = Broadcaster::new(MemoryAdapter::new(2), "t");
    let room = RoomId::new("r1");
    let mut sub = broadcaster.subscribe_to_room(&room).unwrap();

    for i in 0..5 {
        broadcaster
            .broadcast_to_room(&room, Event::ChatMessage, json!({ "n": i }))
            .unwrap();
    }

    assert!(matches!(sub.recv().await, Err(BroadcastError::Lagged(3))));
    assert_eq!(sub.recv().await.unwrap().data["n"], 3);
}

#[tokio::test]
async fn test_closed_channel_ends_subscription() {
    let broadcaster = Broadcaster::new(MemoryAdapter::default(), "t");
    let room = RoomId::new("r1");
    let mut sub = broadcaster.subscribe_to_room(&room).unwrap();
    drop(broadcaster);

    assert!(matches!(sub.recv().await, Err(BroadcastError::Closed)));
}

#[tokio::test]
async fn test_timestamp_is_rfc3339_on_the_wire() {
    let broadcaster = Broadcaster::new(MemoryAdapter::default(), "t");
    let player_id = boardgame_protocol::PlayerId::new("p1");
    let mut sub = broadcaster.subscribe_to_player(&player_id).unwrap();
    broadcaster
        .broadcast_to_player(&player_id, Event::PlayerJoined, json!({}))
        .unwrap();

    let n = sub.recv().await.unwrap();
    let wire = serde_json::to_value(&n).unwrap();
    let stamp = wire["timestamp"].as_str().unwrap();
    let parsed = chrono::DateTime::parse_from_rfc3339(stamp).unwrap();
    assert_eq!(parsed, n.timestamp);
}
