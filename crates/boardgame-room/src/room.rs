//! The `Room` aggregate: a lobby around a single game.

use std::fmt;
use std::sync::Arc;

use boardgame_game::{BaseRule, Game, GameSnapshot, Move, MoveRule};
use boardgame_player::{Player, PlayerSnapshot};
use boardgame_protocol::{
    Event, GameId, MessageId, Metadata, Notifier, RoomId, Topic,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ChatMessage, RoomConfig, RoomError};

/// A lobby that hosts at most one game.
///
/// The room keeps no roster of its own: once a game exists, the room's
/// players *are* the game's players, and before that the room is empty.
/// Capacity (`max_players`) and the host are the room's; turn order and
/// lifecycle are the game's.
///
/// Every successful join, departure, and game start is announced on the
/// room's topic through the notifier. Announcements are fire-and-forget.
pub struct Room<R: MoveRule = BaseRule> {
    id: RoomId,
    name: String,
    host_player: Arc<Player>,
    max_players: usize,
    game: Option<Game<R>>,
    created_at: DateTime<Utc>,
    notifier: Arc<dyn Notifier>,
}

impl<R: MoveRule> Room<R> {
    /// Creates an empty room with the default capacity.
    pub fn new(
        id: impl Into<RoomId>,
        name: impl Into<String>,
        host_player: Arc<Player>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            host_player,
            max_players: RoomConfig::default().max_players,
            game: None,
            created_at: Utc::now(),
            notifier,
        }
    }

    /// Sets the capacity ceiling.
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host_player(&self) -> &Arc<Player> {
        &self.host_player
    }

    pub fn max_players(&self) -> usize {
        self.max_players
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn game(&self) -> Option<&Game<R>> {
        self.game.as_ref()
    }

    /// Direct access to the game, e.g. to set up a rule's board before
    /// starting. Changes made here are not announced.
    pub fn game_mut(&mut self) -> Option<&mut Game<R>> {
        self.game.as_mut()
    }

    // -----------------------------------------------------------------------
    // Game lifecycle
    // -----------------------------------------------------------------------

    /// Creates the room's game, seeded with the currently connected
    /// players. Its id is `"<room id>_game"`.
    ///
    /// # Errors
    /// [`RoomError::GameAlreadyExists`] if the room already has a game; the
    /// existing game is left as it was.
    pub fn create_game(&mut self, metadata: Metadata) -> Result<&Game<R>, RoomError> {
        if self.game.is_some() {
            return Err(RoomError::GameAlreadyExists(self.id.clone()));
        }

        let game = Game::new(
            GameId::for_room(&self.id),
            self.connected_players(),
            metadata,
        );
        tracing::info!(
            room_id = %self.id,
            game_id = %game.id(),
            players = game.players().len(),
            "game created"
        );
        Ok(&*self.game.insert(game))
    }

    /// Starts the room's game and announces `game_started`.
    ///
    /// # Errors
    /// - [`RoomError::NoGame`] before `create_game`
    /// - [`RoomError::Game`] if the game refuses to start (too few
    ///   players, already started)
    pub fn start_game(&mut self) -> Result<(), RoomError> {
        let game = self
            .game
            .as_mut()
            .ok_or_else(|| RoomError::NoGame(self.id.clone()))?;
        game.start()?;

        let snapshot = game.snapshot();
        self.emit(Topic::Room(self.id.clone()), Event::GameStarted, &snapshot);
        Ok(())
    }

    /// Ends the room's game and announces `game_ended`.
    ///
    /// # Errors
    /// [`RoomError::NoGame`] before `create_game`.
    pub fn end_game(&mut self) -> Result<(), RoomError> {
        let game = self
            .game
            .as_mut()
            .ok_or_else(|| RoomError::NoGame(self.id.clone()))?;
        game.end();

        let snapshot = game.snapshot();
        self.emit(Topic::Room(self.id.clone()), Event::GameEnded, &snapshot);
        Ok(())
    }

    /// Hands a move to the game. On success, announces `move_executed` on
    /// the game's topic, and `game_ended` on the room's topic if the rule
    /// finished the game.
    ///
    /// Returns `false` if there is no game or the game rejected the move.
    pub fn process_move(&mut self, mv: &mut Move) -> bool {
        let Some(game) = self.game.as_mut() else {
            return false;
        };
        if !game.process_move(mv) {
            return false;
        }
        let topic = Topic::Game(game.id().clone());
        let ended = game.is_finished().then(|| game.snapshot());

        self.emit(topic, Event::MoveExecuted, &mv.snapshot());
        if let Some(snapshot) = ended {
            tracing::info!(room_id = %self.id, "game finished by move");
            self.emit(Topic::Room(self.id.clone()), Event::GameEnded, &snapshot);
        }
        true
    }

    // -----------------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------------

    /// Adds a player and announces `player_joined`.
    ///
    /// Returns `false` if the room is full or its game is playing. Without
    /// a game the call trivially succeeds: membership only starts to be
    /// tracked once a game exists.
    pub fn add_player(&mut self, player: Arc<Player>) -> bool {
        if self.is_full() {
            tracing::debug!(room_id = %self.id, player_id = %player.id(), "room full");
            return false;
        }
        if self.game.as_ref().is_some_and(|g| g.is_playing()) {
            tracing::debug!(
                room_id = %self.id,
                player_id = %player.id(),
                "game in progress, join refused"
            );
            return false;
        }

        let snapshot = player.snapshot();
        let joined = match self.game.as_mut() {
            Some(game) => game.add_player(player),
            None => true,
        };
        if joined {
            tracing::info!(
                room_id = %self.id,
                player_id = %snapshot.id,
                players = self.players().len(),
                "player joined"
            );
            self.emit(Topic::Room(self.id.clone()), Event::PlayerJoined, &snapshot);
        }
        joined
    }

    /// Removes a player and announces `player_left`.
    ///
    /// Returns `false` only if the game refuses (it is playing). Removing
    /// someone who was never here succeeds.
    pub fn remove_player(&mut self, player: &Player) -> bool {
        let left = match self.game.as_mut() {
            Some(game) => game.remove_player(player.id()),
            None => true,
        };
        if left {
            tracing::info!(
                room_id = %self.id,
                player_id = %player.id(),
                players = self.players().len(),
                "player left"
            );
            self.emit(
                Topic::Room(self.id.clone()),
                Event::PlayerLeft,
                &player.snapshot(),
            );
        }
        left
    }

    /// The game's roster, or nothing if there is no game yet.
    pub fn players(&self) -> &[Arc<Player>] {
        match &self.game {
            Some(game) => game.players().as_slice(),
            None => &[],
        }
    }

    pub fn connected_players(&self) -> Vec<Arc<Player>> {
        self.players()
            .iter()
            .filter(|p| p.is_connected())
            .cloned()
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.players().len() >= self.max_players
    }

    pub fn is_empty(&self) -> bool {
        self.players().is_empty()
    }

    pub fn is_host(&self, player: &Player) -> bool {
        self.host_player.key() == player.key()
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Posts a player's message to the room chat.
    pub fn post_chat(&self, player: &Player, content: impl Into<String>) -> ChatMessage {
        let msg = ChatMessage::chat(MessageId::generate(), player, content, self.id.clone());
        self.post(msg)
    }

    /// Posts a system line to the room chat.
    pub fn post_system(&self, content: impl Into<String>) -> ChatMessage {
        let msg = ChatMessage::system(MessageId::generate(), content, self.id.clone());
        self.post(msg)
    }

    /// Announces an already-built message as `chat_message`.
    pub fn post(&self, msg: ChatMessage) -> ChatMessage {
        self.emit(Topic::Room(self.id.clone()), Event::ChatMessage, &msg);
        msg
    }

    /// The room's public representation.
    pub fn snapshot(&self) -> RoomSnapshot<R::Board> {
        RoomSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            host_player: self.host_player.snapshot(),
            max_players: self.max_players,
            current_players: self.players().len(),
            players: self.players().iter().map(|p| p.snapshot()).collect(),
            game: self.game.as_ref().map(Game::snapshot),
            created_at: self.created_at,
        }
    }

    fn emit<T: Serialize>(&self, topic: Topic, event: Event, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.notifier.notify(topic, event, value),
            Err(e) => tracing::warn!(
                room_id = %self.id,
                %event,
                error = %e,
                "notification payload failed to serialize, dropped"
            ),
        }
    }
}

impl<R: MoveRule> fmt::Debug for Room<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("host_player", &self.host_player.id())
            .field("max_players", &self.max_players)
            .field("game", &self.game)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Everything public about a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot<B = ()> {
    pub id: RoomId,
    pub name: String,
    pub host_player: PlayerSnapshot,
    pub max_players: usize,
    pub current_players: usize,
    pub players: Vec<PlayerSnapshot>,
    pub game: Option<GameSnapshot<B>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use boardgame_protocol::{NullNotifier, RecordingNotifier};
    use serde_json::json;

    use super::*;

    fn player(id: &str, name: &str) -> Arc<Player> {
        let p = Arc::new(Player::new(id, name));
        p.connect();
        p
    }

    fn room_with(notifier: Arc<RecordingNotifier>) -> Room {
        Room::new("r1", "Friday night", player("alice", "Alice"), notifier)
    }

    #[test]
    fn test_new_room_has_no_players() {
        let room: Room = Room::new("r1", "lobby", player("h", "Host"), Arc::new(NullNotifier));
        assert!(room.is_empty());
        assert!(!room.is_full());
        assert!(room.game().is_none());
        assert_eq!(room.max_players(), 4);
    }

    #[test]
    fn test_add_player_without_game_succeeds_but_tracks_nothing() {
        let rec = Arc::new(RecordingNotifier::new());
        let mut room = room_with(Arc::clone(&rec));

        assert!(room.add_player(player("bob", "Bob")));
        assert!(room.players().is_empty());
        assert_eq!(rec.events(), vec![Event::PlayerJoined]);
    }

    #[test]
    fn test_create_game_twice_fails_and_keeps_first() {
        let mut room = room_with(Arc::new(RecordingNotifier::new()));
        let mut meta = Metadata::new();
        meta.insert("round".into(), 1.into());
        room.create_game(meta.clone()).unwrap();
        room.add_player(player("bob", "Bob"));

        let err = room.create_game(Metadata::new()).unwrap_err();
        assert!(matches!(err, RoomError::GameAlreadyExists(_)));

        let game = room.game().unwrap();
        assert_eq!(game.id().as_str(), "r1_game");
        assert_eq!(game.metadata(), &meta);
        assert_eq!(game.players().len(), 1);
    }

    #[test]
    fn test_start_game_without_game_fails() {
        let mut room = room_with(Arc::new(RecordingNotifier::new()));
        assert!(matches!(room.start_game(), Err(RoomError::NoGame(_))));
    }

    #[test]
    fn test_start_game_propagates_not_enough_players() {
        let rec = Arc::new(RecordingNotifier::new());
        let mut room = room_with(Arc::clone(&rec));
        room.create_game(Metadata::new()).unwrap();
        room.add_player(player("bob", "Bob"));

        let err = room.start_game().unwrap_err();
        assert!(matches!(err, RoomError::Game(_)));
        assert!(room.game().unwrap().is_waiting());
        assert!(!rec.events().contains(&Event::GameStarted));
    }

    #[test]
    fn test_start_game_announces_snapshot() {
        let rec = Arc::new(RecordingNotifier::new());
        let mut room = room_with(Arc::clone(&rec));
        room.create_game(Metadata::new()).unwrap();
        room.add_player(player("alice", "Alice"));
        room.add_player(player("bob", "Bob"));
        rec.take();

        room.start_game().unwrap();

        let sent = rec.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].topic, Topic::Room(RoomId::new("r1")));
        assert_eq!(sent[0].event, Event::GameStarted);
        assert_eq!(sent[0].payload["state"], "playing");
        assert_eq!(sent[0].payload["current_player"]["id"], "alice");
        assert_eq!(sent[0].payload["players"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_add_player_refused_while_playing() {
        let mut room = room_with(Arc::new(RecordingNotifier::new()));
        room.create_game(Metadata::new()).unwrap();
        room.add_player(player("alice", "Alice"));
        room.add_player(player("bob", "Bob"));
        room.start_game().unwrap();

        assert!(!room.add_player(player("carol", "Carol")));
        assert_eq!(room.players().len(), 2);
    }

    #[test]
    fn test_remove_player_refused_while_playing() {
        let rec = Arc::new(RecordingNotifier::new());
        let mut room = room_with(Arc::clone(&rec));
        room.create_game(Metadata::new()).unwrap();
        let bob = player("bob", "Bob");
        room.add_player(player("alice", "Alice"));
        room.add_player(Arc::clone(&bob));
        room.start_game().unwrap();
        rec.take();

        assert!(!room.remove_player(&bob));
        assert!(rec.events().is_empty());
    }

    #[test]
    fn test_remove_player_announces_departure() {
        let rec = Arc::new(RecordingNotifier::new());
        let mut room = room_with(Arc::clone(&rec));
        room.create_game(Metadata::new()).unwrap();
        let bob = player("bob", "Bob");
        room.add_player(Arc::clone(&bob));
        rec.take();

        assert!(room.remove_player(&bob));
        assert!(room.is_empty());
        let sent = rec.take();
        assert_eq!(sent[0].event, Event::PlayerLeft);
        assert_eq!(sent[0].payload["name"], "Bob");
    }

    #[test]
    fn test_is_host_by_identity() {
        let room = room_with(Arc::new(RecordingNotifier::new()));
        assert!(room.is_host(&Player::new("alice", "Someone")));
        assert!(!room.is_host(&Player::new("bob", "Bob")));
    }

    #[test]
    fn test_connected_players_follow_flags() {
        let mut room = room_with(Arc::new(RecordingNotifier::new()));
        room.create_game(Metadata::new()).unwrap();
        let bob = player("bob", "Bob");
        room.add_player(Arc::clone(&bob));
        room.add_player(player("carol", "Carol"));

        bob.disconnect();
        let connected = room.connected_players();
        assert_eq!(connected.len(), 1);
        assert_eq!(connected[0].id().as_str(), "carol");
    }

    #[test]
    fn test_process_move_announces_on_game_topic() {
        let rec = Arc::new(RecordingNotifier::new());
        let mut room = room_with(Arc::clone(&rec));
        let alice = player("alice", "Alice");
        room.create_game(Metadata::new()).unwrap();
        room.add_player(Arc::clone(&alice));
        room.add_player(player("bob", "Bob"));
        room.start_game().unwrap();
        rec.take();

        let mut mv = Move::with_id("m1", alice, json!({"cell": 4}));
        assert!(room.process_move(&mut mv));

        let sent = rec.take();
        assert_eq!(sent[0].topic, Topic::Game(GameId::new("r1_game")));
        assert_eq!(sent[0].event, Event::MoveExecuted);
        assert_eq!(sent[0].payload["id"], "m1");
        assert_eq!(sent[0].payload["status"], "executed");
    }

    #[test]
    fn test_process_move_without_game_is_rejected() {
        let mut room = room_with(Arc::new(RecordingNotifier::new()));
        let mut mv = Move::new(player("alice", "Alice"), json!(null));
        assert!(!room.process_move(&mut mv));
    }

    #[test]
    fn test_end_game_announces_and_finishes() {
        let rec = Arc::new(RecordingNotifier::new());
        let mut room = room_with(Arc::clone(&rec));
        assert!(matches!(room.end_game(), Err(RoomError::NoGame(_))));

        room.create_game(Metadata::new()).unwrap();
        room.end_game().unwrap();

        assert!(room.game().unwrap().is_finished());
        assert_eq!(rec.events().last(), Some(&Event::GameEnded));
    }

    /// Ends the game on the first accepted move.
    struct SuddenDeath;

    impl MoveRule for SuddenDeath {
        type Board = ();

        fn perform(game: &mut Game<Self>, _mv: &Move) {
            game.end();
        }
    }

    #[test]
    fn test_move_that_finishes_game_announces_game_ended() {
        let rec = Arc::new(RecordingNotifier::new());
        let alice = player("alice", "Alice");
        let mut room: Room<SuddenDeath> =
            Room::new("r1", "duel", Arc::clone(&alice), rec.clone());
        room.create_game(Metadata::new()).unwrap();
        room.add_player(Arc::clone(&alice));
        room.add_player(player("bob", "Bob"));
        room.start_game().unwrap();
        rec.take();

        let mut mv = Move::new(alice, json!({}));
        assert!(room.process_move(&mut mv));
        assert!(room.game().unwrap().is_finished());

        let sent = rec.take();
        let events: Vec<_> = sent.iter().map(|s| s.event).collect();
        assert_eq!(events, vec![Event::MoveExecuted, Event::GameEnded]);
        assert_eq!(sent[0].topic, Topic::Game(GameId::new("r1_game")));
        assert_eq!(sent[1].topic, Topic::Room(RoomId::new("r1")));
        assert_eq!(sent[1].payload["state"], "finished");
    }

    #[test]
    fn test_ordinary_move_does_not_announce_game_ended() {
        let rec = Arc::new(RecordingNotifier::new());
        let mut room = room_with(Arc::clone(&rec));
        let alice = player("alice", "Alice");
        room.create_game(Metadata::new()).unwrap();
        room.add_player(Arc::clone(&alice));
        room.add_player(player("bob", "Bob"));
        room.start_game().unwrap();
        rec.take();

        assert!(room.process_move(&mut Move::new(alice, json!({}))));
        assert_eq!(rec.events(), vec![Event::MoveExecuted]);
    }

    #[test]
    fn test_post_chat_and_system() {
        let rec = Arc::new(RecordingNotifier::new());
        let room = room_with(Arc::clone(&rec));
        let bob = Player::new("bob", "Bob");

        let chat = room.post_chat(&bob, "hello");
        let sys = room.post_system("server restarting");

        assert!(chat.is_chat());
        assert!(sys.is_system());
        let sent = rec.take();
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|s| s.event == Event::ChatMessage));
        assert_eq!(sent[0].payload["content"], "hello");
        assert_eq!(sent[1].payload["message_type"], "system");
    }

    #[test]
    fn test_snapshot_reflects_game_roster() {
        let mut room = room_with(Arc::new(RecordingNotifier::new()));
        assert!(room.snapshot().game.is_none());

        room.create_game(Metadata::new()).unwrap();
        room.add_player(player("bob", "Bob"));

        let snap = room.snapshot();
        assert_eq!(snap.host_player.id.as_str(), "alice");
        assert_eq!(snap.current_players, 1);
        assert_eq!(snap.players[0].name, "Bob");
        assert!(snap.game.is_some());
    }
}
