use thiserror::Error;

use crate::types::Square;

/// Errors surfaced by the rules engine.
///
/// Undoing with an empty move log is deliberately not an error: `undo_move`
/// returns `None` and leaves the game untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("square ({row}, {col}) is off the board")]
    OutOfBounds { row: i32, col: i32 },

    #[error("no piece on {0} to move")]
    EmptyOriginMove(Square),

    #[error("{0} is not a legal move in this position")]
    IllegalMove(String),

    #[error("invalid square name: {0:?}")]
    InvalidSquareName(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}

pub type Result<T> = std::result::Result<T, ChessError>;
