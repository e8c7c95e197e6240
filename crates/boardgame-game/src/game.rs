//! The `Game` aggregate: roster, turn order, history, lifecycle.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use boardgame_player::{Player, Roster};
use boardgame_protocol::{GameId, Metadata, PlayerId};

use crate::{
    BaseRule, GameError, GameSnapshot, GameState, Move, MoveRule,
};

/// Fewest players a game can start with.
pub const MIN_PLAYERS: usize = 2;

/// A turn-based game instance.
///
/// The roster order is the turn order; `current_player_index` points into
/// it while the game is playing and wraps around after the last player.
/// Moves are validated by the rule `R` and kept in an append-only history.
///
/// All operations are synchronous `&mut self` mutations. A game is not
/// meant to be shared between threads directly: put it behind a single
/// owner (the room actor does this) so `process_move`'s
/// validate → record → rotate sequence can't interleave with another.
///
/// Rejections (wrong phase, wrong turn, bad move) come back as `false`.
/// Only lifecycle misuse is an `Err`, and it is detected before anything
/// changes.
pub struct Game<R: MoveRule = BaseRule> {
    id: GameId,
    state: GameState,
    players: Roster,
    current_player_index: usize,
    metadata: Metadata,
    moves: Vec<Move>,
    board: R::Board,
    _rule: PhantomData<fn() -> R>,
}

impl<R: MoveRule> Game<R> {
    /// Creates a waiting game. Duplicate ids in `players` are dropped,
    /// keeping the first occurrence.
    pub fn new(
        id: impl Into<GameId>,
        players: impl IntoIterator<Item = Arc<Player>>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            state: GameState::Waiting,
            players: players.into_iter().collect(),
            current_player_index: 0,
            metadata,
            moves: Vec::new(),
            board: R::Board::default(),
            _rule: PhantomData,
        }
    }

    /// Rebuilds a game from its snapshot.
    ///
    /// Players and moves come back as fresh `Arc`s, so connectivity is no
    /// longer shared with whoever held the originals.
    ///
    /// # Errors
    /// [`GameError::InvalidSnapshot`] if a playing snapshot's turn index
    /// is out of range or its roster is below [`MIN_PLAYERS`].
    pub fn restore(snapshot: GameSnapshot<R::Board>) -> Result<Self, GameError> {
        let players: Roster = snapshot
            .players
            .into_iter()
            .map(|p| Arc::new(Player::from(p)))
            .collect();

        if snapshot.state == GameState::Playing {
            if players.len() < MIN_PLAYERS {
                return Err(GameError::InvalidSnapshot(format!(
                    "playing game with {} players",
                    players.len()
                )));
            }
            if snapshot.current_player_index >= players.len() {
                return Err(GameError::InvalidSnapshot(format!(
                    "turn index {} out of range for {} players",
                    snapshot.current_player_index,
                    players.len()
                )));
            }
        }

        Ok(Self {
            id: snapshot.id,
            state: snapshot.state,
            players,
            current_player_index: snapshot.current_player_index,
            metadata: snapshot.metadata,
            moves: snapshot.moves.into_iter().map(Move::from).collect(),
            board: snapshot.board,
            _rule: PhantomData,
        })
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn players(&self) -> &Roster {
        &self.players
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// The move history, oldest first.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn board(&self) -> &R::Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut R::Board {
        &mut self.board
    }

    pub fn is_waiting(&self) -> bool {
        self.state == GameState::Waiting
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_finished(&self) -> bool {
        self.state == GameState::Finished
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Moves the game from waiting to playing. The first player on the
    /// roster takes the first turn.
    ///
    /// # Errors
    /// - [`GameError::InvalidTransition`] if the game is not waiting
    /// - [`GameError::NotEnoughPlayers`] with fewer than [`MIN_PLAYERS`]
    pub fn start(&mut self) -> Result<(), GameError> {
        if !self.state.can_transition_to(GameState::Playing) {
            return Err(GameError::InvalidTransition {
                from: self.state,
                to: GameState::Playing,
            });
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: self.players.len(),
            });
        }

        self.state = GameState::Playing;
        self.current_player_index = 0;
        tracing::info!(
            game_id = %self.id,
            players = self.players.len(),
            "game started"
        );
        Ok(())
    }

    /// Finishes the game, whatever state it is in.
    pub fn end(&mut self) {
        if self.state != GameState::Finished {
            tracing::info!(game_id = %self.id, from = %self.state, "game ended");
        }
        self.state = GameState::Finished;
    }

    // -----------------------------------------------------------------------
    // Turns
    // -----------------------------------------------------------------------

    /// The player whose turn it is. `None` unless the game is playing.
    pub fn current_player(&self) -> Option<&Arc<Player>> {
        if !self.is_playing() {
            return None;
        }
        self.players.get(self.current_player_index)
    }

    /// Passes the turn to the next player, wrapping after the last one.
    ///
    /// Returns `false` (and does nothing) unless the game is playing.
    pub fn next_turn(&mut self) -> bool {
        if !self.is_playing() || self.players.is_empty() {
            return false;
        }
        self.current_player_index =
            (self.current_player_index + 1) % self.players.len();
        true
    }

    // -----------------------------------------------------------------------
    // Roster
    // -----------------------------------------------------------------------

    /// Adds a player at the end of the turn order.
    ///
    /// Returns `false` once the game has started or finished. Adding a
    /// player who is already on the roster (same id) succeeds without
    /// duplicating them.
    pub fn add_player(&mut self, player: Arc<Player>) -> bool {
        if !self.state.accepts_players() {
            tracing::debug!(
                game_id = %self.id,
                player_id = %player.id(),
                state = %self.state,
                "add_player rejected"
            );
            return false;
        }
        self.players.insert(player);
        true
    }

    /// Removes the player with this id.
    ///
    /// Returns `false` while the game is playing. Otherwise returns `true`,
    /// including when the player was not on the roster.
    pub fn remove_player(&mut self, id: &PlayerId) -> bool {
        if self.is_playing() {
            tracing::debug!(
                game_id = %self.id,
                player_id = %id,
                "remove_player rejected while playing"
            );
            return false;
        }
        self.players.remove(id);
        true
    }

    // -----------------------------------------------------------------------
    // Moves
    // -----------------------------------------------------------------------

    /// Runs a move through the game as a single step.
    ///
    /// Returns `false` without touching `mv` if the game is not playing.
    /// Otherwise runs [`Move::execute`]; if that succeeds the move is
    /// appended to the history and the turn passes. A rejected move leaves
    /// the roster, the turn index, and the history exactly as they were.
    pub fn process_move(&mut self, mv: &mut Move) -> bool {
        if !self.is_playing() {
            return false;
        }

        if !mv.execute(self) {
            tracing::debug!(
                game_id = %self.id,
                move_id = %mv.id(),
                player_id = %mv.player().id(),
                reason = mv.error_message().unwrap_or_default(),
                "move rejected"
            );
            return false;
        }

        self.moves.push(mv.clone());
        self.next_turn();
        tracing::debug!(
            game_id = %self.id,
            move_id = %mv.id(),
            player_id = %mv.player().id(),
            history = self.moves.len(),
            "move executed"
        );
        true
    }

    /// The most recently recorded move.
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// The game's public representation.
    pub fn snapshot(&self) -> GameSnapshot<R::Board> {
        GameSnapshot {
            id: self.id.clone(),
            state: self.state,
            players: self.players.snapshots(),
            current_player_index: self.current_player_index,
            current_player: self.current_player().map(|p| p.snapshot()),
            metadata: self.metadata.clone(),
            moves: self.moves.iter().map(Move::snapshot).collect(),
            board: self.board.clone(),
        }
    }
}

// Written by hand so `R` itself needn't be `Clone`/`Debug`; only its board
// is.
impl<R: MoveRule> Clone for Game<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            state: self.state,
            players: self.players.clone(),
            current_player_index: self.current_player_index,
            metadata: self.metadata.clone(),
            moves: self.moves.clone(),
            board: self.board.clone(),
            _rule: PhantomData,
        }
    }
}

impl<R: MoveRule> fmt::Debug for Game<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("players", &self.players)
            .field("current_player_index", &self.current_player_index)
            .field("metadata", &self.metadata)
            .field("moves", &self.moves)
            .field("board", &self.board)
            .finish()
    }
}
