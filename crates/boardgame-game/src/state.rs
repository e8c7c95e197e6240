//! The game lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a game.
///
/// Transitions only go forward:
///
/// ```text
/// Waiting ──start──→ Playing ──end──→ Finished
///    └──────────────end──────────────────↑
/// ```
///
/// - **Waiting**: roster is open. Players may be added and removed.
/// - **Playing**: roster is frozen, turns rotate, moves are accepted.
/// - **Finished**: terminal. Nothing is accepted any more; removing a
///   player is still allowed so lobbies can clean up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Waiting,
    Playing,
    Finished,
}

impl GameState {
    /// Returns `true` if players may join.
    pub fn accepts_players(self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Returns `true` while moves are accepted.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// The next state in the normal progression, `None` once finished.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Playing),
            Self::Playing => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if moving to `target` is a legal transition.
    ///
    /// Besides the normal progression, any unfinished game may jump
    /// straight to `Finished` (forced termination).
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
            || (target == Self::Finished && self != Self::Finished)
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Playing => write!(f, "playing"),
            Self::Finished => write!(f, "finished"),
        }
    }
}
