pub mod board;
pub mod error;
pub mod game_move;
pub mod game_state;
pub mod logger;
pub mod perft;
pub mod types;

pub use board::Board;
pub use error::{ChessError, Result};
pub use game_move::Move;
pub use game_state::GameState;
pub use logger::GameLogger;
pub use types::*;
