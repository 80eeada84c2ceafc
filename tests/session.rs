use assert_matches::assert_matches;

use tictactoe_engine::{
    board::{Mark, MoveError, Status},
    session::{JumpError, Session},
};

mod common;

use common::board;

/// X wins the top row: X 0, O 3, X 1, O 4, X 2
fn play_cross_win(session: &mut Session) {
    for cell in [0, 3, 1, 4] {
        session.play(cell).expect("Move should be legal");
    }
    assert_matches!(
        session.play(2),
        Ok(Status::Won {
            mark: Mark::Cross,
            line: [0, 1, 2]
        })
    );
}

#[test]
fn test_center_opening() {
    let mut session = Session::new();
    let status = session.play(4).expect("Opening move should be legal");

    assert_matches!(
        status,
        Status::InProgress {
            turn: Mark::Nought
        }
    );
    assert_eq!(*session.board(), board("....X...."));
    assert_eq!(session.turn(), Mark::Nought);
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.cursor(), 1);
    assert_eq!(session.last_move(), Some(4));
}

#[test]
fn test_turn_alternates_through_the_history() {
    let mut session = Session::new();
    for cell in [4, 0, 1, 7, 6] {
        session.play(cell).expect("Move should be legal");
    }
    for (index, snapshot) in session.history().iter().enumerate() {
        let expected = match index {
            0 => None,
            odd if odd % 2 == 1 => Some(Mark::Cross),
            _ => Some(Mark::Nought),
        };
        assert_eq!(snapshot.mover(), expected, "Snapshot {index}");
    }
}

#[test]
fn test_win_is_tallied_exactly_once() {
    let mut session = Session::new();
    play_cross_win(&mut session);
    assert_eq!(session.scores().cross, 1);
    assert!(session.celebrating());

    // Revisiting the terminal snapshot does not re-count
    session.jump_to(3).expect("Jump should be in range");
    session.jump_to(5).expect("Jump should be in range");
    session.jump_to(5).expect("Jump should be in range");
    assert_eq!(session.scores().cross, 1);
    assert_eq!(session.scores().nought, 0);
    assert_eq!(session.scores().ties, 0);
}

#[test]
fn test_draw_is_tallied_as_a_tie() {
    let mut session = Session::new();
    // X O X / O O X / X X O, no winner at any point
    for cell in [0, 1, 2, 3, 5, 4, 6, 8] {
        session.play(cell).expect("Move should be legal");
    }
    assert_matches!(session.play(7), Ok(Status::Draw));
    assert_eq!(session.scores().ties, 1);
    assert!(!session.celebrating(), "Draws do not celebrate");
}

#[test]
fn test_rewon_line_after_jump_counts_again() {
    let mut session = Session::new();
    play_cross_win(&mut session);
    assert_eq!(session.scores().cross, 1);

    // Back before the winning move; the old future is discarded on play
    session.jump_to(4).expect("Jump should be in range");
    session.play(5).expect("Move should be legal");
    session.play(8).expect("Move should be legal");
    assert_matches!(session.play(2), Ok(Status::Won { .. }));
    assert_eq!(session.scores().cross, 2);
}

#[test]
fn test_play_after_jump_truncates_the_future() {
    let mut session = Session::new();
    for cell in [0, 3, 1] {
        session.play(cell).expect("Move should be legal");
    }
    assert_eq!(session.history().len(), 4);

    session.jump_to(1).expect("Jump should be in range");
    session.play(5).expect("Move should be legal");

    assert_eq!(session.history().len(), 3);
    assert_eq!(session.cursor(), 2);
    assert_eq!(session.history()[2].cell(), Some(5));
    assert_eq!(session.history()[2].mover(), Some(Mark::Nought));
}

#[test]
fn test_jump_out_of_range_is_rejected() {
    let mut session = Session::new();
    session.play(0).expect("Move should be legal");
    assert_matches!(
        session.jump_to(2),
        Err(JumpError::OutOfRange { index: 2, len: 2 })
    );
    // State untouched
    assert_eq!(session.cursor(), 1);
}

#[test]
fn test_jump_clears_the_highlight() {
    let mut session = Session::new();
    session.play(4).expect("Move should be legal");
    assert_eq!(session.last_move(), Some(4));
    session.jump_to(0).expect("Jump should be in range");
    assert_eq!(session.last_move(), None);
}

#[test]
fn test_no_moves_accepted_after_the_game_ends() {
    let mut session = Session::new();
    play_cross_win(&mut session);
    assert_matches!(session.play(5), Err(MoveError::Finished));
    assert_eq!(session.history().len(), 6);

    // But playing on from an earlier snapshot is fine
    session.jump_to(2).expect("Jump should be in range");
    assert_matches!(session.play(8), Ok(Status::InProgress { .. }));
}

#[test]
fn test_occupied_and_out_of_bounds_moves_leave_state_unchanged() {
    let mut session = Session::new();
    session.play(4).expect("Move should be legal");
    let generation = session.generation();

    assert_matches!(session.play(4), Err(MoveError::Occupied(4)));
    assert_matches!(session.play(42), Err(MoveError::OutOfBounds(42)));
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.generation(), generation);
}

#[test]
fn test_new_game_keeps_the_scores() {
    let mut session = Session::new();
    play_cross_win(&mut session);
    session.new_game();

    assert_eq!(session.history().len(), 1);
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.last_move(), None);
    assert!(!session.celebrating());
    assert_eq!(session.scores().cross, 1);
}

#[test]
fn test_reset_all_zeroes_the_scores() {
    let mut session = Session::new();
    play_cross_win(&mut session);
    session.reset_all();

    assert_eq!(session.history().len(), 1);
    assert_eq!(session.scores().cross, 0);
    assert_eq!(session.scores().nought, 0);
    assert_eq!(session.scores().ties, 0);
}

#[test]
fn test_mode_change_forces_a_full_reset() {
    let mut session = Session::new();
    play_cross_win(&mut session);

    session.set_mode(true);
    assert!(session.vs_computer());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.scores().cross, 0);

    // Setting the same mode again is a no-op
    play_cross_win(&mut session);
    session.set_mode(true);
    assert_eq!(session.scores().cross, 1);
    assert_eq!(session.history().len(), 6);
}

#[test]
fn test_move_descriptions() {
    let mut session = Session::new();
    session.play(4).expect("Move should be legal");
    session.play(2).expect("Move should be legal");

    assert_eq!(
        session.moves(),
        vec![
            "game start".to_string(),
            "move 1: X at (1,1)".to_string(),
            "move 2: O at (0,2)".to_string(),
        ]
    );
}

#[test]
fn test_stale_celebration_token_is_ignored() {
    let mut session = Session::new();
    play_cross_win(&mut session);
    let token = session.generation();

    // A reset in between invalidates the token
    session.new_game();
    assert!(!session.end_celebration(token));

    // A fresh win clears with its own token
    play_cross_win(&mut session);
    assert!(session.end_celebration(session.generation()));
    assert!(!session.celebrating());
}
