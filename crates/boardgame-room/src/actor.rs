//! Room actor: a Tokio task that owns a room and serializes access to it.
//!
//! A `Room` is a plain `&mut self` value. To share one between connection
//! handlers, it is moved into its own task and driven by commands over an
//! mpsc channel. The task handles one command at a time, so every
//! mutation (and in particular `process_move`'s validate → record → rotate
//! sequence) runs to completion before the next one starts. No locks, just
//! message passing.

use std::sync::Arc;

use boardgame_game::{GameSnapshot, GameState, Move, MoveRule};
use boardgame_player::Player;
use boardgame_protocol::{Metadata, RoomId};
use tokio::sync::{mpsc, oneshot};

use crate::{ChatMessage, Room, RoomError, RoomSnapshot};

/// Commands sent to a room actor through its channel.
///
/// Most variants carry a `oneshot::Sender`: the caller sends the command
/// and waits for the answer on that reply channel.
pub(crate) enum RoomCommand<R: MoveRule> {
    AddPlayer {
        player: Arc<Player>,
        reply: oneshot::Sender<bool>,
    },
    RemovePlayer {
        player: Arc<Player>,
        reply: oneshot::Sender<bool>,
    },
    CreateGame {
        metadata: Metadata,
        reply: oneshot::Sender<Result<GameSnapshot<R::Board>, RoomError>>,
    },
    StartGame {
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    EndGame {
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    ProcessMove {
        mv: Move,
        reply: oneshot::Sender<MoveOutcome>,
    },
    PostChat {
        player: Arc<Player>,
        content: String,
        reply: oneshot::Sender<ChatMessage>,
    },
    Snapshot {
        reply: oneshot::Sender<RoomSnapshot<R::Board>>,
    },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// The result of submitting a move to a room actor.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    /// Whether the game accepted the move.
    pub accepted: bool,
    /// The move as it came out: executed, failed with a message, or still
    /// pending if the room had no playing game.
    pub mv: Move,
}

/// A summary of a room, cheap enough for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub name: String,
    /// The game's state, or `None` if no game was created yet.
    pub game_state: Option<GameState>,
    pub player_count: usize,
    pub max_players: usize,
}

impl RoomInfo {
    /// Returns `true` if a join could succeed right now.
    pub fn is_joinable(&self) -> bool {
        self.player_count < self.max_players
            && self.game_state.is_none_or(GameState::accepts_players)
    }
}

/// Handle to a running room actor.
///
/// Cheap to clone (it wraps an `mpsc::Sender`). Every method fails with
/// [`RoomError::Unavailable`] once the actor has stopped.
pub struct RoomHandle<R: MoveRule> {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand<R>>,
}

// Manual impl: deriving would demand `R: Clone`.
impl<R: MoveRule> Clone for RoomHandle<R> {
    fn clone(&self) -> Self {
        Self {
            room_id: self.room_id.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<R: MoveRule> std::fmt::Debug for RoomHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomHandle")
            .field("room_id", &self.room_id)
            .finish_non_exhaustive()
    }
}

impl<R: MoveRule> RoomHandle<R> {
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Returns `true` while the actor is still accepting commands.
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }

    /// See [`Room::add_player`].
    pub async fn add_player(&self, player: Arc<Player>) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::AddPlayer { player, reply })
            .await
    }

    /// See [`Room::remove_player`].
    pub async fn remove_player(&self, player: Arc<Player>) -> Result<bool, RoomError> {
        self.request(|reply| RoomCommand::RemovePlayer { player, reply })
            .await
    }

    /// See [`Room::create_game`]. Returns the new game's snapshot.
    pub async fn create_game(
        &self,
        metadata: Metadata,
    ) -> Result<GameSnapshot<R::Board>, RoomError> {
        self.request(|reply| RoomCommand::CreateGame { metadata, reply })
            .await?
    }

    /// See [`Room::start_game`].
    pub async fn start_game(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::StartGame { reply }).await?
    }

    /// See [`Room::end_game`].
    pub async fn end_game(&self) -> Result<(), RoomError> {
        self.request(|reply| RoomCommand::EndGame { reply }).await?
    }

    /// Submits a move and waits for the verdict.
    pub async fn submit_move(&self, mv: Move) -> Result<MoveOutcome, RoomError> {
        self.request(|reply| RoomCommand::ProcessMove { mv, reply })
            .await
    }

    /// See [`Room::post_chat`].
    pub async fn post_chat(
        &self,
        player: Arc<Player>,
        content: impl Into<String>,
    ) -> Result<ChatMessage, RoomError> {
        let content = content.into();
        self.request(|reply| RoomCommand::PostChat {
            player,
            content,
            reply,
        })
        .await
    }

    /// The room's full public representation.
    pub async fn snapshot(&self) -> Result<RoomSnapshot<R::Board>, RoomError> {
        self.request(|reply| RoomCommand::Snapshot { reply }).await
    }

    /// A short summary of the room.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        self.request(|reply| RoomCommand::Info { reply }).await
    }

    /// Tells the actor to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }

    /// Sends a command built around a fresh reply channel and awaits the
    /// answer.
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> RoomCommand<R>,
    ) -> Result<T, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }
}

/// The task side: owns the room, drains the channel.
struct RoomActor<R: MoveRule> {
    room: Room<R>,
    receiver: mpsc::Receiver<RoomCommand<R>>,
}

impl<R: MoveRule> RoomActor<R> {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room.id(), "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            // A dropped reply receiver means the caller gave up waiting;
            // the command has still been applied.
            match cmd {
                RoomCommand::AddPlayer { player, reply } => {
                    let _ = reply.send(self.room.add_player(player));
                }
                RoomCommand::RemovePlayer { player, reply } => {
                    let _ = reply.send(self.room.remove_player(&player));
                }
                RoomCommand::CreateGame { metadata, reply } => {
                    let result = self
                        .room
                        .create_game(metadata)
                        .map(|game| game.snapshot());
                    let _ = reply.send(result);
                }
                RoomCommand::StartGame { reply } => {
                    let _ = reply.send(self.room.start_game());
                }
                RoomCommand::EndGame { reply } => {
                    let _ = reply.send(self.room.end_game());
                }
                RoomCommand::ProcessMove { mut mv, reply } => {
                    let accepted = self.room.process_move(&mut mv);
                    let _ = reply.send(MoveOutcome { accepted, mv });
                }
                RoomCommand::PostChat {
                    player,
                    content,
                    reply,
                } => {
                    let _ = reply.send(self.room.post_chat(&player, content));
                }
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.room.snapshot());
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.room.id(), "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room.id(), "room actor stopped");
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room.id().clone(),
            name: self.room.name().to_owned(),
            game_state: self.room.game().map(|g| g.state()),
            player_count: self.room.players().len(),
            max_players: self.room.max_players(),
        }
    }
}

/// Moves `room` into a new actor task and returns a handle to it.
///
/// `buffer` bounds the command channel; when it is full, senders wait.
/// Must be called from within a Tokio runtime.
pub fn spawn_room<R: MoveRule>(room: Room<R>, buffer: usize) -> RoomHandle<R> {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let room_id = room.id().clone();

    let actor = RoomActor { room, receiver: rx };
    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
