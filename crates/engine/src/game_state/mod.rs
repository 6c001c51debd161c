use std::fmt;

use crate::board::Board;
use crate::error::{ChessError, Result};
use crate::game_move::Move;
use crate::types::*;

// Declare submodules
pub mod moves;
pub mod state;
pub mod validation;

/// The game state machine: board, side to move, move log and the per-ply
/// stacks that make `undo_move` the exact inverse of `make_move`.
///
/// The make/undo protocol is not reentrant. A search layer working on top of
/// this should clone the state rather than probe a shared instance.
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    move_log: Vec<Move>,
    white_king: Square,
    black_king: Square,
    castling_rights: CastlingRights,
    // Parallel to move_log, one entry longer: index 0 is the initial state.
    castling_rights_log: Vec<CastlingRights>,
    en_passant_target: Option<Square>,
    en_passant_log: Vec<Option<Square>>,
    checkmate: bool,
    stalemate: bool,
}

impl GameState {
    /// Standard starting position, white to move.
    pub fn new() -> Self {
        Self::from_parts(
            Board::standard(),
            Color::White,
            Square::at(7, 4),
            Square::at(0, 4),
            CastlingRights::ALL,
            None,
        )
    }

    fn from_parts(
        board: Board,
        side_to_move: Color,
        white_king: Square,
        black_king: Square,
        castling_rights: CastlingRights,
        en_passant_target: Option<Square>,
    ) -> Self {
        Self {
            board,
            side_to_move,
            move_log: Vec::new(),
            white_king,
            black_king,
            castling_rights,
            castling_rights_log: vec![castling_rights],
            en_passant_target,
            en_passant_log: vec![en_passant_target],
            checkmate: false,
            stalemate: false,
        }
    }

    /// Set up a position from FEN. The halfmove and fullmove fields are
    /// optional and ignored.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 4 && parts.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 4 or 6 fields, got {}",
                parts.len()
            )));
        }

        let board = parse_piece_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ChessError::InvalidFen(format!("bad active colour {:?}", other))),
        };

        let castling_rights = parse_castling_rights(parts[2])?;

        let en_passant_target = match parts[3] {
            "-" => None,
            name => Some(
                name.parse::<Square>()
                    .map_err(|_| ChessError::InvalidFen(format!("bad en passant square {:?}", name)))?,
            ),
        };

        let white_king = board
            .find_king(Color::White)
            .ok_or_else(|| ChessError::InvalidFen("white king missing".to_string()))?;
        let black_king = board
            .find_king(Color::Black)
            .ok_or_else(|| ChessError::InvalidFen("black king missing".to_string()))?;

        Ok(Self::from_parts(
            board,
            side_to_move,
            white_king,
            black_king,
            castling_rights,
            en_passant_target,
        ))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.move_log.last()
    }

    pub fn king_location(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Valid only as of the most recent `get_valid_moves` call.
    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Valid only as of the most recent `get_valid_moves` call.
    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    /// Terminal flags plus a fresh check test for the side to move.
    pub fn status(&self) -> GameStatus {
        if self.checkmate {
            GameStatus::Checkmate(self.side_to_move)
        } else if self.stalemate {
            GameStatus::Stalemate
        } else if self.in_check() {
            GameStatus::Check(self.side_to_move)
        } else {
            GameStatus::InProgress
        }
    }

    fn set_king_location(&mut self, color: Color, square: Square) {
        match color {
            Color::White => self.white_king = square,
            Color::Black => self.black_king = square,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f, "{} to move", self.side_to_move)
    }
}

fn parse_piece_placement(placement: &str) -> Result<Board> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(ChessError::InvalidFen("piece placement must have 8 ranks".to_string()));
    }

    let mut board = Board::empty();
    // FEN lists rank 8 first, which is row 0 here
    for (row, row_str) in rows.iter().enumerate() {
        let mut col = 0u32;
        for ch in row_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                col += skip;
                continue;
            }
            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| ChessError::InvalidFen(format!("unknown piece {:?}", ch)))?;
            if col >= 8 {
                return Err(ChessError::InvalidFen(format!("rank {:?} is too long", row_str)));
            }
            board.set(Square::at(row as u8, col as u8), Some(piece));
            col += 1;
        }
        if col != 8 {
            return Err(ChessError::InvalidFen(format!("rank {:?} does not cover 8 files", row_str)));
        }
    }

    Ok(board)
}

fn parse_castling_rights(castling: &str) -> Result<CastlingRights> {
    let mut rights = CastlingRights::NONE;
    if castling == "-" {
        return Ok(rights);
    }

    for ch in castling.chars() {
        match ch {
            'K' => rights.white_kingside = true,
            'Q' => rights.white_queenside = true,
            'k' => rights.black_kingside = true,
            'q' => rights.black_queenside = true,
            _ => return Err(ChessError::InvalidFen(format!("bad castling right {:?}", ch))),
        }
    }

    Ok(rights)
}
