//! Heuristic opponent
//!
//! Fixed-priority tiers, no search: win now, block, center, random corner,
//! random cell. Beatable by design.

use rand::{Rng, seq::IndexedRandom};

use crate::board::{Board, CellIdx, Mark};

/// Corner cells, preferred over edges when no tactical move exists
const CORNERS: [CellIdx; 4] = [0, 2, 6, 8];

/// Center cell
const CENTER: CellIdx = 4;

/// Whether placing `mark` at `idx` completes a line
fn wins_at(board: &Board, idx: CellIdx, mark: Mark) -> bool {
    board
        .with_move(idx, mark)
        .is_ok_and(|next| next.winner() == Some(mark))
}

/// Chooses a move for `mark` on `board`.
///
/// Tiers, first applicable wins:
/// 1. Complete an own line (lowest index, scan order 0..9)
/// 2. Block the opponent completing a line (scan order 0..9)
/// 3. Take the center
/// 4. Take a corner, uniformly at random among the empty ones
/// 5. Take any empty cell, uniformly at random
///
/// Returns `None` only when the board has no empty cell or is already won;
/// callers are expected to check the game status first.
pub fn choose_move<R: Rng + ?Sized>(board: &Board, mark: Mark, rng: &mut R) -> Option<CellIdx> {
    if board.winner().is_some() {
        return None;
    }

    // Win now
    if let Some(idx) = board.empty_cells().find(|&idx| wins_at(board, idx, mark)) {
        log::debug!("Policy: {mark} wins at cell {idx}");
        return Some(idx);
    }

    // Block the opponent
    let opponent = mark.opponent();
    if let Some(idx) = board
        .empty_cells()
        .find(|&idx| wins_at(board, idx, opponent))
    {
        log::debug!("Policy: {mark} blocks {opponent} at cell {idx}");
        return Some(idx);
    }

    // Center
    if board.is_legal(CENTER) {
        return Some(CENTER);
    }

    // Random empty corner
    let corners: Vec<CellIdx> = CORNERS
        .into_iter()
        .filter(|&idx| board.is_legal(idx))
        .collect();
    if let Some(&idx) = corners.choose(rng) {
        return Some(idx);
    }

    // Any remaining empty cell
    let remaining: Vec<CellIdx> = board.empty_cells().collect();
    remaining.choose(rng).copied()
}
