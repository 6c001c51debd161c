use std::fmt;

use crate::error::Result;
use crate::types::*;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The 8x8 grid. Pure data: all rule logic lives in `GameState`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    pub fn empty() -> Self {
        Self { squares: [None; 64] }
    }

    /// The standard starting position: black on rows 0-1, white on rows 6-7.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            board.squares[col] = Some(Piece::new(Color::Black, kind));
            board.squares[8 + col] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            board.squares[48 + col] = Some(Piece::new(Color::White, PieceKind::Pawn));
            board.squares[56 + col] = Some(Piece::new(Color::White, kind));
        }
        board
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    /// Raw coordinate access; fails fast instead of wrapping off the grid.
    pub fn piece_at(&self, row: i32, col: i32) -> Result<Option<Piece>> {
        Ok(self.get(Square::new(row, col)?))
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.get(square).map(|piece| piece.color)
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| {
            self.get(sq)
                .is_some_and(|piece| piece.is(color, PieceKind::King))
        })
    }

    /// Occupied squares with their pieces, row 0 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|piece| (sq, piece)))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            let cells: Vec<String> = (0..8)
                .map(|col| match self.squares[row * 8 + col] {
                    Some(piece) => piece.code(),
                    None => "--".to_string(),
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChessError;

    #[test]
    fn standard_position_layout() {
        let board = Board::standard();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(
            board.piece_at(7, 4).unwrap(),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            board.piece_at(0, 3).unwrap(),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(board.piece_at(4, 4).unwrap(), None);
        assert_eq!(board.find_king(Color::Black), Square::new(0, 4).ok());
    }

    #[test]
    fn raw_access_is_bounds_checked() {
        let board = Board::standard();
        assert_eq!(board.piece_at(-1, 0), Err(ChessError::OutOfBounds { row: -1, col: 0 }));
        assert_eq!(board.piece_at(3, 8), Err(ChessError::OutOfBounds { row: 3, col: 8 }));
    }

    #[test]
    fn display_uses_two_character_codes() {
        let text = Board::standard().to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "bR bN bB bQ bK bB bN bR");
        assert_eq!(lines[4], "-- -- -- -- -- -- -- --");
        assert_eq!(lines[7], "wR wN wB wQ wK wB wN wR");
    }
}
