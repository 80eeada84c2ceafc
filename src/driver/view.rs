use serde::Serialize;

use crate::{
    board::{Board, CellIdx, Mark, Status},
    session::{Scoreboard, Session},
};

/// Everything the presentation layer observes, captured at one point in
/// time. Published on the driver's watch channel after every state change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    /// Displayed board
    pub board: Board,
    /// Whose turn it is on the displayed board
    pub turn: Mark,
    /// Terminal status of the displayed board
    pub status: Status,
    /// Human readable move list, one entry per history snapshot
    pub moves: Vec<String>,
    /// Index of the displayed snapshot
    pub cursor: usize,
    /// Cross-game scores
    pub scores: Scoreboard,
    /// Cell filled by the most recent move, for highlighting
    pub last_move: Option<CellIdx>,
    /// Whether the win celebration should currently display
    pub celebrating: bool,
    /// Whether Nought is played by the computer
    pub vs_computer: bool,
}

impl GameView {
    pub fn capture(session: &Session) -> Self {
        Self {
            board: *session.board(),
            turn: session.turn(),
            status: session.status(),
            moves: session.moves(),
            cursor: session.cursor(),
            scores: session.scores(),
            last_move: session.last_move(),
            celebrating: session.celebrating(),
            vs_computer: session.vs_computer(),
        }
    }
}
