//! Tic-tac-toe game engine
//!
//! Pure game rules, a replayable move history with score tallying, a
//! heuristic computer opponent, and an async driver that wires them to a
//! presentation layer through channels.

/// Board representation and game rules
pub mod board;

/// Heuristic computer opponent
pub mod policy;

/// Move history, cursor, scoreboard
pub mod session;

/// Async event loop: intents in, views out, timed opponent moves
pub mod driver;
