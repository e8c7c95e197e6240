use boardgame::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; 3]; 3],
}

impl Board {
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    fn has_line(&self, m: Cell) -> bool {
        let b = &self.cells;
        (0..3).any(|i| (0..3).all(|j| b[i][j] == m))           // rows
        || (0..3).any(|j| (0..3).all(|i| b[i][j] == m))        // cols
        || (0..3).all(|i| b[i][i] == m)                         // diagonal
        || (0..3).all(|i| b[i][2 - i] == m)                     // anti-diagonal
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(|row| row.iter().all(|c| *c != Cell::Empty))
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// Moves are `{"row": r, "col": c}`. The first seat plays X.
pub struct TicTacToe;

fn cell_of(mv: &Move) -> Result<(usize, usize), String> {
    let coord = |key: &str| {
        mv.data()[key]
            .as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| format!("missing {key}"))
    };
    let (row, col) = (coord("row")?, coord("col")?);
    if row >= 3 || col >= 3 {
        return Err("row and col must be 0-2".into());
    }
    Ok((row, col))
}

impl MoveRule for TicTacToe {
    type Board = Board;

    fn validate(game: &Game<Self>, mv: &Move) -> Result<(), String> {
        let (row, col) = cell_of(mv)?;
        if game.board().get(row, col) != Cell::Empty {
            return Err("cell is occupied".into());
        }
        Ok(())
    }

    fn perform(game: &mut Game<Self>, mv: &Move) {
        let Ok((row, col)) = cell_of(mv) else { return };
        let mark = if game.current_player_index() == 0 { Cell::X } else { Cell::O };
        game.board_mut().cells[row][col] = mark;

        if game.board().has_line(mark) {
            let winner = mv.player().id().to_string();
            game.metadata_mut().insert("winner".into(), json!(winner));
            game.end();
        } else if game.board().is_full() {
            game.metadata_mut().insert("winner".into(), json!(null));
            game.end();
        }
    }
}

// ---------------------------------------------------------------------------
// Scripted match
// ---------------------------------------------------------------------------

/// Plays `script` (seat, row, col) between Alice (X) and Bob (O) and
/// returns the final game snapshot plus the moves broadcast on the game
/// channel.
async fn play(
    script: &[(&str, u64, u64)],
) -> Result<(GameSnapshot<Board>, Vec<Notification>), BoardgameError> {
    let lobby: Lobby<TicTacToe> = Lobby::builder()
        .room_config(RoomConfig { max_players: 2, ..RoomConfig::default() })
        .build();

    for (id, name) in [("alice", "Alice"), ("bob", "Bob")] {
        lobby.register_player(id, name).await?;
        lobby.connect_player(&PlayerId::new(id)).await?;
    }

    let room = lobby.open_room("tic-tac-toe", &PlayerId::new("alice")).await?;
    let mut moves = lobby
        .broadcaster()
        .subscribe_to_game(&GameId::for_room(&room))?;
    lobby.join_room(&PlayerId::new("bob"), &room).await?;
    lobby.start_game(&room).await?;

    for &(who, row, col) in script {
        let outcome = lobby
            .submit_move(&PlayerId::new(who), json!({ "row": row, "col": col }))
            .await?;
        if !outcome.accepted {
            tracing::warn!(
                player = who,
                row,
                col,
                reason = outcome.mv.error_message().unwrap_or_default(),
                "move rejected"
            );
        }
    }

    let snapshot = lobby.room(&room).await?.snapshot().await?;
    let game = snapshot
        .game
        .ok_or_else(|| boardgame::room::RoomError::NoGame(room.clone()))?;
    Ok((game, moves.drain()?))
}

fn render(board: &Board) -> String {
    board
        .cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|c| match c {
                    Cell::Empty => '.',
                    Cell::X => 'X',
                    Cell::O => 'O',
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boardgame::init_tracing();

    let script = [
        ("alice", 0, 0),
        ("bob", 1, 0),
        ("alice", 0, 0), // occupied, rejected
        ("alice", 0, 1),
        ("bob", 1, 1),
        ("bob", 2, 2), // out of turn, rejected
        ("alice", 0, 2),
    ];
    let (game, moves) = play(&script).await?;

    eprintln!("{}", render(&game.board));
    eprintln!(
        "state: {}, moves broadcast: {}, winner: {}",
        game.state,
        moves.len(),
        game.metadata.get("winner").cloned().unwrap_or_default()
    );
    Ok(())
}
