use std::fmt;
use std::hash::{Hash, Hasher};

use crate::board::Board;
use crate::error::{ChessError, Result};
use crate::types::*;

/// One ply, captured from the board it was built on.
///
/// Equality and hashing look only at the (start, end) pair, so a move built
/// from user clicks matches the flagged move in the legal-move list.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    start: Square,
    end: Square,
    piece_moved: Piece,
    piece_captured: Option<Piece>,
    is_pawn_promotion: bool,
    is_en_passant: bool,
    is_castle: bool,
}

impl Move {
    /// An ordinary move or capture. Promotion is inferred when a pawn lands
    /// on its last row.
    pub fn new(start: Square, end: Square, board: &Board) -> Result<Self> {
        Self::build(start, end, board, false, false)
    }

    /// An en passant capture; the captured pawn is recorded even though it
    /// does not stand on `end`.
    pub(crate) fn en_passant(start: Square, end: Square, board: &Board) -> Result<Self> {
        Self::build(start, end, board, true, false)
    }

    /// A castle, encoded as the king's two-column step.
    pub(crate) fn castle(start: Square, end: Square, board: &Board) -> Result<Self> {
        Self::build(start, end, board, false, true)
    }

    fn build(
        start: Square,
        end: Square,
        board: &Board,
        is_en_passant: bool,
        is_castle: bool,
    ) -> Result<Self> {
        let piece_moved = board.get(start).ok_or(ChessError::EmptyOriginMove(start))?;
        Ok(Self::with_piece(start, end, piece_moved, board, is_en_passant, is_castle))
    }

    /// Builder for generators that already hold the moving piece.
    pub(crate) fn with_piece(
        start: Square,
        end: Square,
        piece_moved: Piece,
        board: &Board,
        is_en_passant: bool,
        is_castle: bool,
    ) -> Self {
        let piece_captured = if is_en_passant {
            Some(Piece::new(piece_moved.color.opposite(), PieceKind::Pawn))
        } else {
            board.get(end)
        };
        let is_pawn_promotion = piece_moved.kind == PieceKind::Pawn
            && end.row() == piece_moved.color.promotion_row();

        Self {
            start,
            end,
            piece_moved,
            piece_captured,
            is_pawn_promotion,
            is_en_passant,
            is_castle,
        }
    }

    pub fn start(&self) -> Square {
        self.start
    }

    pub fn end(&self) -> Square {
        self.end
    }

    pub fn piece_moved(&self) -> Piece {
        self.piece_moved
    }

    pub fn piece_captured(&self) -> Option<Piece> {
        self.piece_captured
    }

    pub fn is_capture(&self) -> bool {
        self.piece_captured.is_some()
    }

    pub fn is_pawn_promotion(&self) -> bool {
        self.is_pawn_promotion
    }

    pub fn is_en_passant(&self) -> bool {
        self.is_en_passant
    }

    pub fn is_castle(&self) -> bool {
        self.is_castle
    }

    /// Wing of a castle move, `None` for every other move.
    pub fn castle_side(&self) -> Option<CastleSide> {
        if !self.is_castle {
            return None;
        }
        if self.end.col() > self.start.col() {
            Some(CastleSide::Kingside)
        } else {
            Some(CastleSide::Queenside)
        }
    }

    /// Numeric identity derived from the coordinates alone.
    pub fn move_id(&self) -> u32 {
        self.start.row() as u32 * 1000
            + self.start.col() as u32 * 100
            + self.end.row() as u32 * 10
            + self.end.col() as u32
    }

    /// Square-pair notation, e.g. `e2e4`.
    pub fn notation(&self) -> String {
        format!("{}{}", self.start.name(), self.end.name())
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn captures_pieces_from_the_board() {
        let board = Board::standard();
        let mv = Move::new(sq("e2"), sq("e4"), &board).unwrap();
        assert_eq!(mv.piece_moved(), Piece::new(Color::White, PieceKind::Pawn));
        assert_eq!(mv.piece_captured(), None);
        assert!(!mv.is_pawn_promotion());
        assert_eq!(mv.notation(), "e2e4");
        assert_eq!(mv.move_id(), 6444);
    }

    #[test]
    fn empty_origin_is_rejected() {
        let board = Board::standard();
        assert_eq!(
            Move::new(sq("e4"), sq("e5"), &board),
            Err(ChessError::EmptyOriginMove(sq("e4")))
        );
    }

    #[test]
    fn promotion_is_inferred_on_the_last_row() {
        let mut board = Board::empty();
        board.set(sq("a7"), Some(Piece::new(Color::White, PieceKind::Pawn)));
        board.set(sq("h2"), Some(Piece::new(Color::Black, PieceKind::Pawn)));
        assert!(Move::new(sq("a7"), sq("a8"), &board).unwrap().is_pawn_promotion());
        assert!(Move::new(sq("h2"), sq("h1"), &board).unwrap().is_pawn_promotion());
        assert!(!Move::new(sq("h2"), sq("h3"), &board).unwrap().is_pawn_promotion());
    }

    #[test]
    fn en_passant_records_the_passed_pawn() {
        let mut board = Board::empty();
        board.set(sq("e5"), Some(Piece::new(Color::White, PieceKind::Pawn)));
        board.set(sq("d5"), Some(Piece::new(Color::Black, PieceKind::Pawn)));
        let mv = Move::en_passant(sq("e5"), sq("d6"), &board).unwrap();
        assert!(mv.is_en_passant());
        assert_eq!(mv.piece_captured(), Some(Piece::new(Color::Black, PieceKind::Pawn)));
    }

    #[test]
    fn equality_ignores_flags() {
        let board = Board::standard();
        let plain = Move::new(sq("e1"), sq("g1"), &board).unwrap();
        let castle = Move::castle(sq("e1"), sq("g1"), &board).unwrap();
        assert_eq!(plain, castle);
        assert!(castle.is_castle() && !plain.is_castle());
        assert_eq!(castle.castle_side(), Some(CastleSide::Kingside));
        assert_eq!(plain.castle_side(), None);
    }
}
