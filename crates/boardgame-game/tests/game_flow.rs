//! Integration tests for the game engine using a small custom rule.

use std::sync::Arc;

use boardgame_game::{
    BaseRule, Game, GameError, GameSnapshot, GameState, Move, MoveRule,
    MoveStatus,
};
use boardgame_player::Player;
use boardgame_protocol::{Metadata, PlayerId};
use serde_json::json;

// =========================================================================
// Mock rule: take 1-3 stones from a pile, whoever takes the last one wins.
// =========================================================================

struct Nim;

impl MoveRule for Nim {
    type Board = u32;

    fn validate(game: &Game<Self>, mv: &Move) -> Result<(), String> {
        let take = mv.data()["take"].as_u64().ok_or("missing take")?;
        if !(1..=3).contains(&take) {
            return Err("take 1-3 stones".into());
        }
        if take > u64::from(*game.board()) {
            return Err(String::new());
        }
        Ok(())
    }

    fn perform(game: &mut Game<Self>, mv: &Move) {
        let take = mv.data()["take"].as_u64().unwrap_or(0) as u32;
        *game.board_mut() -= take;
        if *game.board() == 0 {
            let winner = mv.player().id().to_string();
            game.metadata_mut().insert("winner".into(), winner.into());
            game.end();
        }
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn alice() -> Arc<Player> {
    Arc::new(Player::new("alice", "Alice"))
}

fn bob() -> Arc<Player> {
    Arc::new(Player::new("bob", "Bob"))
}

fn started<R: MoveRule>(players: Vec<Arc<Player>>) -> Game<R> {
    let mut game = Game::new("g1", players, Metadata::new());
    game.start().unwrap();
    game
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn test_two_player_turn_scenario() {
    let (a, b) = (alice(), bob());
    let mut game: Game = started(vec![Arc::clone(&a), Arc::clone(&b)]);
    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.current_player().unwrap().id(), a.id());

    let mut bobs = Move::new(Arc::clone(&b), json!({}));
    assert!(!game.process_move(&mut bobs));
    assert_eq!(game.current_player().unwrap().id(), a.id());
    assert_eq!(bobs.status(), MoveStatus::Failed);

    let mut alices = Move::new(Arc::clone(&a), json!({}));
    assert!(game.process_move(&mut alices));
    assert_eq!(game.current_player().unwrap().id(), b.id());
    assert_eq!(game.moves().len(), 1);
}

#[test]
fn test_single_player_cannot_start() {
    let mut game: Game = Game::new("g1", [alice()], Metadata::new());
    let result = game.start();
    assert!(matches!(result, Err(GameError::NotEnoughPlayers { .. })));
    assert_eq!(game.state(), GameState::Waiting);
}

#[test]
fn test_rejected_move_leaves_game_untouched() {
    let mut game: Game<Nim> = started(vec![alice(), bob()]);
    *game.board_mut() = 10;
    let before = game.snapshot();

    // Wrong turn.
    let mut wrong_turn = Move::new(bob(), json!({"take": 1}));
    assert!(!game.process_move(&mut wrong_turn));
    // Rule violation by the right player.
    let mut too_many = Move::new(alice(), json!({"take": 7}));
    assert!(!game.process_move(&mut too_many));

    assert_eq!(game.snapshot(), before);
    assert_eq!(too_many.error_message(), Some("invalid move: take 1-3 stones"));
}

#[test]
fn test_rule_with_empty_reason_gives_generic_message() {
    let mut game: Game<Nim> = started(vec![alice(), bob()]);
    *game.board_mut() = 2;

    let mut mv = Move::new(alice(), json!({"take": 3}));
    assert!(!game.process_move(&mut mv));
    assert_eq!(mv.error_message(), Some("invalid move"));
}

#[test]
fn test_rule_perform_mutates_board_and_can_end_game() {
    let mut game: Game<Nim> = started(vec![alice(), bob()]);
    *game.board_mut() = 5;

    let script = [("alice", 3), ("bob", 1), ("alice", 1)];
    for (who, take) in script {
        let player = Arc::new(Player::new(who, who));
        let mut mv = Move::new(player, json!({ "take": take }));
        assert!(game.process_move(&mut mv), "{who} taking {take}");
    }

    assert_eq!(*game.board(), 0);
    assert!(game.is_finished());
    assert_eq!(game.metadata()["winner"], "alice");
    assert_eq!(game.moves().len(), 3);

    // Nothing is accepted after the end.
    let mut late = Move::new(bob(), json!({"take": 1}));
    assert!(!game.process_move(&mut late));
    assert!(late.is_pending());
}

#[test]
fn test_base_rule_accepts_any_payload() {
    let mut game: Game<BaseRule> = started(vec![alice(), bob()]);
    for payload in [json!(null), json!("x"), json!({"anything": [1, 2]})] {
        let current = Arc::clone(game.current_player().unwrap());
        let mut mv = Move::new(current, payload);
        assert!(game.process_move(&mut mv));
    }
    assert_eq!(game.moves().len(), 3);
}

#[test]
fn test_rotation_returns_to_start_after_full_round() {
    let players: Vec<_> = (0..4)
        .map(|i| Arc::new(Player::new(format!("p{i}"), format!("P{i}"))))
        .collect();
    let mut game: Game = started(players.clone());

    for round in 0..2 {
        for p in &players {
            assert_eq!(game.current_player().unwrap().id(), p.id(), "round {round}");
            let mut mv = Move::new(Arc::clone(p), json!(round));
            assert!(game.process_move(&mut mv));
        }
    }
    assert_eq!(game.current_player_index(), 0);
}

#[test]
fn test_disconnect_is_visible_through_game_roster() {
    let a = alice();
    let game: Game = Game::new("g1", [Arc::clone(&a), bob()], Metadata::new());
    a.connect();
    assert!(game.players().get(0).unwrap().is_connected());
    a.disconnect();
    assert!(!game.players().get(0).unwrap().is_connected());
}

// =========================================================================
// Snapshot round trip
// =========================================================================

#[test]
fn test_snapshot_json_round_trip_is_lossless() {
    let mut meta = Metadata::new();
    meta.insert("variant".into(), json!({"pile": 9}));
    let mut game: Game<Nim> = Game::new("g1", [alice(), bob()], meta);
    *game.board_mut() = 9;
    game.start().unwrap();

    let mut ok = Move::with_id("m1", alice(), json!({"take": 2}));
    game.process_move(&mut ok);
    let mut bad = Move::with_id("m2", alice(), json!({"take": 1}));
    game.process_move(&mut bad);

    let snap = game.snapshot();
    let bytes = serde_json::to_vec(&snap).unwrap();
    let decoded: GameSnapshot<u32> = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(decoded, snap);
    assert_eq!(decoded.id, *game.id());
    assert_eq!(decoded.state, game.state());
    assert_eq!(decoded.current_player_index, game.current_player_index());
    assert_eq!(decoded.metadata, *game.metadata());
    assert_eq!(decoded.moves.len(), 1);
    assert_eq!(decoded.board, 7);
}

#[test]
fn test_restore_from_snapshot_resumes_play() {
    let mut game: Game<Nim> = started(vec![alice(), bob()]);
    *game.board_mut() = 6;
    let mut mv = Move::new(alice(), json!({"take": 1}));
    game.process_move(&mut mv);

    let json = serde_json::to_string(&game.snapshot()).unwrap();
    let snap: GameSnapshot<u32> = serde_json::from_str(&json).unwrap();
    let mut restored = Game::<Nim>::restore(snap).unwrap();

    assert_eq!(restored.snapshot(), game.snapshot());
    assert_eq!(restored.current_player().unwrap().id(), &PlayerId::new("bob"));

    let mut next = Move::new(bob(), json!({"take": 2}));
    assert!(restored.process_move(&mut next));
    assert_eq!(*restored.board(), 3);
}
