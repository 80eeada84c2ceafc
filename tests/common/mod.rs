use tictactoe_engine::board::{Board, Cell, Mark};

/// Builds a board from a 9 character row-major string: 'X', 'O', '.'
pub fn board(cells: &str) -> Board {
    let cells: Vec<Cell> = cells
        .chars()
        .map(|c| match c {
            'X' => Some(Mark::Cross),
            'O' => Some(Mark::Nought),
            '.' => None,
            other => panic!("Unexpected cell character: {other}"),
        })
        .collect();
    let cells: [Cell; 9] = cells
        .try_into()
        .expect("A board needs exactly 9 cells");
    Board::from(cells)
}
