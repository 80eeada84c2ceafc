use std::{fmt::Display, ops::Index};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player marks
pub mod mark;

pub use mark::Mark;

/// Number of cells on the board
pub const BOARD_CELLS: usize = 9;

/// Cell index in row-major order, row = index / 3, column = index % 3
pub type CellIdx = usize;

/// The 8 winning lines, checked in fixed order: rows, columns, diagonals
pub const LINES: [[CellIdx; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Board position
/// `None`: Empty cell
/// `Some(mark)`: Cell occupied by `mark`
pub type Cell = Option<Mark>;

/// Tic-tac-toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Board([Cell; BOARD_CELLS]);

impl From<[Cell; BOARD_CELLS]> for Board {
    fn from(cells: [Cell; BOARD_CELLS]) -> Self {
        Self(cells)
    }
}

impl Index<CellIdx> for Board {
    type Output = Cell;

    fn index(&self, index: CellIdx) -> &Self::Output {
        debug_assert!(index < BOARD_CELLS, "Index out of bounds: {index}");
        &self.0[index]
    }
}

/// Errors that can occur when placing a mark
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveError {
    #[error("cell {0} is outside of the board")]
    OutOfBounds(CellIdx),
    #[error("cell {0} is already occupied")]
    Occupied(CellIdx),
    #[error("the game is already finished")]
    Finished,
}

/// Outcome of evaluating a board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Status {
    /// Game is ongoing, `turn` moves next
    InProgress { turn: Mark },
    /// `mark` completed the given line
    Won { mark: Mark, line: [CellIdx; 3] },
    /// Board is full with no winner
    Draw,
}

impl Board {
    /// New empty board
    pub fn new() -> Self {
        Self([None; BOARD_CELLS])
    }

    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.0
    }

    /// Returns the cell at `idx`, or an error outside the board
    pub fn get(&self, idx: CellIdx) -> Result<Cell, MoveError> {
        self.0
            .get(idx)
            .copied()
            .ok_or(MoveError::OutOfBounds(idx))
    }

    /// Number of occupied cells
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Cell::is_some)
    }

    /// Iterate on the indices of the empty cells
    pub fn empty_cells(&self) -> impl Iterator<Item = CellIdx> {
        self.0.iter().positions(Cell::is_none)
    }

    /// Whose turn it is, derived from occupancy: Cross on even fill counts.
    /// Always consistent with the move history length.
    pub fn turn(&self) -> Mark {
        if self.filled() % 2 == 0 {
            Mark::Cross
        } else {
            Mark::Nought
        }
    }

    /// The winner together with the completed line, first matching line in
    /// the fixed scan order. Legal play never produces two lines of
    /// different marks.
    pub fn winning_line(&self) -> Option<(Mark, [CellIdx; 3])> {
        LINES.into_iter().find_map(|line| {
            let [a, b, c] = line;
            match (self[a], self[b], self[c]) {
                (Some(mark), Some(m2), Some(m3)) if mark == m2 && mark == m3 => {
                    Some((mark, line))
                }
                _ => None,
            }
        })
    }

    pub fn winner(&self) -> Option<Mark> {
        self.winning_line().map(|(mark, _)| mark)
    }

    /// A draw is a full board without a winner
    pub fn is_draw(&self) -> bool {
        self.winner().is_none() && self.is_full()
    }

    /// A move is legal iff the cell exists, is empty, and nobody has won yet
    pub fn is_legal(&self, idx: CellIdx) -> bool {
        matches!(self.get(idx), Ok(None)) && self.winner().is_none()
    }

    /// Returns a new board with `mark` placed at `idx`.
    /// Never mutates the receiver, so callers keeping history hold both.
    pub fn with_move(&self, idx: CellIdx, mark: Mark) -> Result<Board, MoveError> {
        if self.winner().is_some() {
            return Err(MoveError::Finished);
        }
        match self.get(idx)? {
            Some(_) => Err(MoveError::Occupied(idx)),
            None => {
                let mut next = *self;
                next.0[idx] = Some(mark);
                Ok(next)
            }
        }
    }

    /// Evaluate the position
    pub fn status(&self) -> Status {
        if let Some((mark, line)) = self.winning_line() {
            Status::Won { mark, line }
        } else if self.is_full() {
            Status::Draw
        } else {
            Status::InProgress { turn: self.turn() }
        }
    }
}

/// Board display
impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                match self[row * 3 + col] {
                    Some(mark) => write!(f, "{mark} ")?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
