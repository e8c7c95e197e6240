//! A single move attempt: who, what, and how it went.

use std::sync::Arc;

use boardgame_player::Player;
use boardgame_protocol::MoveId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Game, MoveRejection, MoveRule, MoveSnapshot};

/// Where a move is in its (one-shot) lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    Pending,
    Executed,
    Failed,
}

/// One action attempted by one player.
///
/// `data` is an opaque JSON payload: the engine never inspects it, the
/// game's [`MoveRule`] does.
///
/// A move starts [`Pending`](MoveStatus::Pending) and leaves that state
/// exactly once, on the first [`execute`](Self::execute). Outcomes are
/// reported through the return value and the status/error fields, never
/// through `Err` or a panic, so callers can push a batch of moves through
/// without special-casing failures.
#[derive(Debug, Clone)]
pub struct Move {
    id: MoveId,
    player: Arc<Player>,
    data: serde_json::Value,
    status: MoveStatus,
    timestamp: DateTime<Utc>,
    executed_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
}

impl Move {
    /// Creates a pending move with a freshly generated id.
    pub fn new(player: Arc<Player>, data: serde_json::Value) -> Self {
        Self::with_id(MoveId::generate(), player, data)
    }

    /// Creates a pending move with a caller-supplied id.
    pub fn with_id(
        id: impl Into<MoveId>,
        player: Arc<Player>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            player,
            data,
            status: MoveStatus::Pending,
            timestamp: Utc::now(),
            executed_at: None,
            error_message: None,
        }
    }

    pub fn id(&self) -> &MoveId {
        &self.id
    }

    pub fn player(&self) -> &Arc<Player> {
        &self.player
    }

    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    pub fn status(&self) -> MoveStatus {
        self.status
    }

    /// When the move was created.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// When the move was executed. `None` unless it succeeded.
    pub fn executed_at(&self) -> Option<DateTime<Utc>> {
        self.executed_at
    }

    /// Why the move failed. `None` unless it failed.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == MoveStatus::Pending
    }

    pub fn is_executed(&self) -> bool {
        self.status == MoveStatus::Executed
    }

    pub fn is_failed(&self) -> bool {
        self.status == MoveStatus::Failed
    }

    /// Returns `true` if `game` would accept this move right now.
    pub fn is_valid<R: MoveRule>(&self, game: &Game<R>) -> bool {
        self.check(game).is_ok()
    }

    /// Executes the move against `game`.
    ///
    /// On success the move is marked executed, stamped, and the rule's
    /// [`perform`](MoveRule::perform) hook runs. On failure it is marked
    /// failed with the first applicable [`MoveRejection`] as its message,
    /// and `game` is not touched.
    ///
    /// A move that already left `Pending` is not re-run: this returns
    /// `false` and changes nothing.
    pub fn execute<R: MoveRule>(&mut self, game: &mut Game<R>) -> bool {
        if !self.is_pending() {
            tracing::debug!(
                move_id = %self.id,
                status = ?self.status,
                "move already resolved, not executing again"
            );
            return false;
        }

        match self.check(game) {
            Ok(()) => {
                self.status = MoveStatus::Executed;
                self.executed_at = Some(Utc::now());
                R::perform(game, self);
                true
            }
            Err(rejection) => {
                self.status = MoveStatus::Failed;
                self.error_message = Some(rejection.to_string());
                false
            }
        }
    }

    /// Runs the checks in priority order: phase, turn, then the rule.
    fn check<R: MoveRule>(&self, game: &Game<R>) -> Result<(), MoveRejection> {
        if !game.is_playing() {
            return Err(MoveRejection::NotPlaying);
        }
        let on_turn = game
            .current_player()
            .is_some_and(|current| current.key() == self.player.key());
        if !on_turn {
            return Err(MoveRejection::NotYourTurn {
                player: self.player.name().to_owned(),
            });
        }
        R::validate(game, self).map_err(|reason| {
            if reason.is_empty() {
                MoveRejection::Invalid
            } else {
                MoveRejection::Illegal(reason)
            }
        })
    }

    /// The move's public representation.
    pub fn snapshot(&self) -> MoveSnapshot {
        MoveSnapshot {
            id: self.id.clone(),
            player: self.player.snapshot(),
            data: self.data.clone(),
            status: self.status,
            timestamp: self.timestamp,
            executed_at: self.executed_at,
            error_message: self.error_message.clone(),
        }
    }
}

impl From<MoveSnapshot> for Move {
    fn from(snapshot: MoveSnapshot) -> Self {
        Self {
            id: snapshot.id,
            player: Arc::new(Player::from(snapshot.player)),
            data: snapshot.data,
            status: snapshot.status,
            timestamp: snapshot.timestamp,
            executed_at: snapshot.executed_at,
            error_message: snapshot.error_message,
        }
    }
}
