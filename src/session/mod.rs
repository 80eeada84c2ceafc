//! Game session state
//!
//! Ordered log of board snapshots with a cursor for time-travel, score
//! tallying across games, and a generation counter that lets delayed tasks
//! detect that the state moved on underneath them.

use serde::Serialize;
use thiserror::Error;

use crate::board::{Board, CellIdx, Mark, MoveError, Status};

/// One entry of the move history: the board after a move, plus the mark and
/// cell that produced it (`None` for the initial empty snapshot)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    board: Board,
    mover: Option<Mark>,
    cell: Option<CellIdx>,
}

impl Snapshot {
    /// Initial snapshot: empty board, no move
    fn initial() -> Self {
        Self {
            board: Board::new(),
            mover: None,
            cell: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mover(&self) -> Option<Mark> {
        self.mover
    }

    pub fn cell(&self) -> Option<CellIdx> {
        self.cell
    }

    /// Human readable description: `"game start"` or `"move N: X at (row,col)"`
    pub fn describe(&self, index: usize) -> String {
        match (self.mover, self.cell) {
            (Some(mark), Some(cell)) => {
                format!(
                    "move {index}: {mark} at ({row},{col})",
                    row = cell / 3,
                    col = cell % 3
                )
            }
            _ => "game start".to_string(),
        }
    }
}

/// Win and tie counts, persisted across games within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Scoreboard {
    pub cross: u32,
    pub nought: u32,
    pub ties: u32,
}

impl Scoreboard {
    fn record_win(&mut self, mark: Mark) {
        match mark {
            Mark::Cross => self.cross += 1,
            Mark::Nought => self.nought += 1,
        }
    }

    fn record_tie(&mut self) {
        self.ties += 1;
    }
}

/// Error when jumping to a history entry that does not exist
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum JumpError {
    #[error("move {index} is outside of the history (length {len})")]
    OutOfRange { index: usize, len: usize },
}

/// A tic-tac-toe session: current game history plus cross-game scores
#[derive(Debug)]
pub struct Session {
    /// Snapshot log, always starting with the empty board
    history: Vec<Snapshot>,
    /// Index of the displayed snapshot
    cursor: usize,
    /// Cross-game score counts
    scores: Scoreboard,
    /// Whether Nought is played by the computer
    vs_computer: bool,
    /// Cell filled by the most recent `play`, for highlighting
    last_move: Option<CellIdx>,
    /// Generation at which the current celebration started, if any
    celebration: Option<u64>,
    /// Bumped on every state change; stale scheduled tasks compare against it
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            history: vec![Snapshot::initial()],
            cursor: 0,
            scores: Scoreboard::default(),
            vs_computer: false,
            last_move: None,
            celebration: None,
            generation: 0,
        }
    }

    /// Board of the displayed snapshot
    pub fn board(&self) -> &Board {
        &self.history[self.cursor].board
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scores(&self) -> Scoreboard {
        self.scores
    }

    pub fn vs_computer(&self) -> bool {
        self.vs_computer
    }

    pub fn last_move(&self) -> Option<CellIdx> {
        self.last_move
    }

    pub fn celebrating(&self) -> bool {
        self.celebration.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whose turn it is on the displayed board
    pub fn turn(&self) -> Mark {
        self.board().turn()
    }

    /// Status of the displayed board
    pub fn status(&self) -> Status {
        self.board().status()
    }

    /// Human readable move list, one entry per history snapshot
    pub fn moves(&self) -> Vec<String> {
        self.history
            .iter()
            .enumerate()
            .map(|(index, snapshot)| snapshot.describe(index))
            .collect()
    }

    /// Plays the current turn's mark at `idx` on the displayed board.
    ///
    /// Snapshots past the cursor are discarded first, so playing after a
    /// jump rewrites the future. Scores are tallied here and only here:
    /// each play that lands in a terminal position counts exactly once, and
    /// revisiting a terminal snapshot with [`Self::jump_to`] never
    /// re-counts.
    pub fn play(&mut self, idx: CellIdx) -> Result<Status, MoveError> {
        let mark = self.board().turn();
        let next = self.board().with_move(idx, mark)?;

        self.history.truncate(self.cursor + 1);
        self.history.push(Snapshot {
            board: next,
            mover: Some(mark),
            cell: Some(idx),
        });
        self.cursor = self.history.len() - 1;
        self.last_move = Some(idx);
        self.generation += 1;
        log::debug!(
            "{mark} played cell {idx} (move {cursor})",
            cursor = self.cursor
        );

        let status = next.status();
        match status {
            Status::Won { mark, line } => {
                self.scores.record_win(mark);
                self.celebration = Some(self.generation);
                log::info!("{mark} wins on line {line:?}");
            }
            Status::Draw => {
                self.scores.record_tie();
                log::info!("Game drawn");
            }
            Status::InProgress { .. } => {}
        }
        Ok(status)
    }

    /// Moves the cursor to a previous (or later, after jumping back)
    /// snapshot without touching the history or the scores
    pub fn jump_to(&mut self, index: usize) -> Result<(), JumpError> {
        if index >= self.history.len() {
            return Err(JumpError::OutOfRange {
                index,
                len: self.history.len(),
            });
        }
        self.cursor = index;
        self.last_move = None;
        self.generation += 1;
        log::debug!("Jumped to move {index}");
        Ok(())
    }

    /// Starts a fresh game, keeping the scoreboard
    pub fn new_game(&mut self) {
        self.history = vec![Snapshot::initial()];
        self.cursor = 0;
        self.last_move = None;
        self.celebration = None;
        self.generation += 1;
        log::debug!("New game");
    }

    /// Fresh game and a zeroed scoreboard
    pub fn reset_all(&mut self) {
        self.new_game();
        self.scores = Scoreboard::default();
        log::debug!("Scores reset");
    }

    /// Switches between human-vs-human and human-vs-computer.
    /// A mode change forces a full reset, scores included.
    pub fn set_mode(&mut self, vs_computer: bool) {
        if self.vs_computer == vs_computer {
            return;
        }
        self.vs_computer = vs_computer;
        self.reset_all();
        log::info!("Mode changed: vs_computer = {vs_computer}");
    }

    /// Ends the celebration started at generation `token`.
    /// A stale token (the state changed since) is a no-op.
    /// Returns whether the flag was cleared.
    pub fn end_celebration(&mut self, token: u64) -> bool {
        if self.celebration == Some(token) {
            self.celebration = None;
            self.generation += 1;
            true
        } else {
            false
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
