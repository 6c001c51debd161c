use super::GameState;
use crate::game_move::Move;
use crate::types::*;

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

impl GameState {
    /// Pseudo-legal moves for the side to move. Ignores check and castling.
    pub fn get_all_possible_moves(&self) -> Vec<Move> {
        self.pseudo_legal_moves(self.side_to_move)
    }

    /// Pseudo-legal moves for `color`, whoever is on move.
    pub fn pseudo_legal_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();

        for (square, piece) in self.board.pieces() {
            if piece.color != color {
                continue;
            }
            match piece.kind {
                PieceKind::Pawn => self.get_pawn_moves(square, piece, &mut moves),
                PieceKind::Knight => self.get_knight_moves(square, piece, &mut moves),
                PieceKind::Bishop => self.get_bishop_moves(square, piece, &mut moves),
                PieceKind::Rook => self.get_rook_moves(square, piece, &mut moves),
                PieceKind::Queen => self.get_queen_moves(square, piece, &mut moves),
                PieceKind::King => self.get_king_moves(square, piece, &mut moves),
            }
        }

        moves
    }

    /// Generate pawn moves
    fn get_pawn_moves(&self, square: Square, pawn: Piece, moves: &mut Vec<Move>) {
        let color = pawn.color;
        let direction = color.pawn_direction();

        // Forward moves only onto empty squares
        if let Some(one_step) = square.offset(direction, 0) {
            if self.board.is_empty(one_step) {
                moves.push(self.quiet_or_capture(square, one_step, pawn));

                if square.row() == color.pawn_home_row() {
                    if let Some(two_step) = square.offset(2 * direction, 0) {
                        if self.board.is_empty(two_step) {
                            moves.push(self.quiet_or_capture(square, two_step, pawn));
                        }
                    }
                }
            }
        }

        for d_col in [-1, 1] {
            let Some(target) = square.offset(direction, d_col) else {
                continue;
            };

            match self.board.color_at(target) {
                Some(target_color) if target_color != color => {
                    moves.push(self.quiet_or_capture(square, target, pawn));
                }
                None if self.is_en_passant_capture(square, target, color) => {
                    moves.push(Move::with_piece(square, target, pawn, &self.board, true, false));
                }
                _ => {}
            }
        }
    }

    /// En passant is only ever open to the side on move, and only onto the
    /// target square beside a pawn of the other colour.
    fn is_en_passant_capture(&self, start: Square, target: Square, color: Color) -> bool {
        if color != self.side_to_move || self.en_passant_target != Some(target) {
            return false;
        }
        let passed = Square::at(start.row(), target.col());
        self.board
            .get(passed)
            .is_some_and(|piece| piece.is(color.opposite(), PieceKind::Pawn))
    }

    /// Generate knight moves
    fn get_knight_moves(&self, square: Square, knight: Piece, moves: &mut Vec<Move>) {
        self.get_step_moves(square, knight, &KNIGHT_OFFSETS, moves);
    }

    /// Generate bishop moves
    fn get_bishop_moves(&self, square: Square, bishop: Piece, moves: &mut Vec<Move>) {
        self.get_sliding_moves(square, bishop, &BISHOP_DIRECTIONS, moves);
    }

    /// Generate rook moves
    fn get_rook_moves(&self, square: Square, rook: Piece, moves: &mut Vec<Move>) {
        self.get_sliding_moves(square, rook, &ROOK_DIRECTIONS, moves);
    }

    /// Generate queen moves
    fn get_queen_moves(&self, square: Square, queen: Piece, moves: &mut Vec<Move>) {
        self.get_rook_moves(square, queen, moves);
        self.get_bishop_moves(square, queen, moves);
    }

    /// Generate king moves. Castling is handled by `get_castle_moves`.
    fn get_king_moves(&self, square: Square, king: Piece, moves: &mut Vec<Move>) {
        self.get_step_moves(square, king, &KING_OFFSETS, moves);
    }

    fn get_step_moves(
        &self,
        square: Square,
        piece: Piece,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(d_row, d_col) in offsets {
            let Some(target) = square.offset(d_row, d_col) else {
                continue;
            };
            if self.board.color_at(target) != Some(piece.color) {
                moves.push(self.quiet_or_capture(square, target, piece));
            }
        }
    }

    /// Generate sliding piece moves in given directions
    fn get_sliding_moves(
        &self,
        square: Square,
        piece: Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(d_row, d_col) in directions {
            let mut current = square;
            while let Some(target) = current.offset(d_row, d_col) {
                match self.board.color_at(target) {
                    None => moves.push(self.quiet_or_capture(square, target, piece)),
                    Some(color) if color != piece.color => {
                        moves.push(self.quiet_or_capture(square, target, piece));
                        break;
                    }
                    Some(_) => break, // Own piece
                }
                current = target;
            }
        }
    }

    fn quiet_or_capture(&self, start: Square, end: Square, piece: Piece) -> Move {
        Move::with_piece(start, end, piece, &self.board, false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destinations(game: &GameState, from: &str) -> Vec<String> {
        let from: Square = from.parse().unwrap();
        let mut names: Vec<String> = game
            .get_all_possible_moves()
            .into_iter()
            .filter(|mv| mv.start() == from)
            .map(|mv| mv.end().name())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn opening_position_has_twenty_pseudo_legal_moves() {
        let game = GameState::new();
        assert_eq!(game.get_all_possible_moves().len(), 20);
        assert_eq!(game.pseudo_legal_moves(Color::Black).len(), 20);
    }

    #[test]
    fn pawn_double_step_needs_both_squares_empty() {
        let game = GameState::from_fen("4k3/8/8/8/8/4n3/4P3/4K3 w - -").unwrap();
        assert!(destinations(&game, "e2").is_empty());

        let game = GameState::from_fen("4k3/8/8/8/4n3/8/4P3/4K3 w - -").unwrap();
        assert_eq!(destinations(&game, "e2"), vec!["e3"]);
    }

    #[test]
    fn pawn_captures_only_enemy_pieces() {
        let game = GameState::from_fen("4k3/8/8/8/8/3p1N2/4P3/4K3 w - -").unwrap();
        assert_eq!(destinations(&game, "e2"), vec!["d3", "e3", "e4"]);
    }

    #[test]
    fn black_pawns_move_down_the_board() {
        let game = GameState::from_fen("4k3/3p4/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(destinations(&game, "d7"), vec!["d5", "d6"]);
    }

    #[test]
    fn en_passant_is_generated_onto_the_target() {
        let game = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6").unwrap();
        let ep: Vec<Move> = game
            .get_all_possible_moves()
            .into_iter()
            .filter(|mv| mv.is_en_passant())
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].notation(), "e5d6");
        assert_eq!(ep[0].piece_captured(), Some(Piece::new(Color::Black, PieceKind::Pawn)));
    }

    #[test]
    fn knight_moves_stay_on_the_board() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/N3K3 w - -").unwrap();
        assert_eq!(destinations(&game, "a1"), vec!["b3", "c2"]);
    }

    #[test]
    fn rays_stop_at_blockers_and_include_captures() {
        let game = GameState::from_fen("4k3/8/8/8/8/p7/8/R1N1K3 w - -").unwrap();
        assert_eq!(destinations(&game, "a1"), vec!["a2", "a3", "b1"]);
    }

    #[test]
    fn bishop_and_queen_rays() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/1P6/B3K3 w - -").unwrap();
        assert!(destinations(&game, "a1").is_empty());

        let game = GameState::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - -").unwrap();
        // 7 up the file, 3 along the rank before the king, 7 on the diagonal
        assert_eq!(destinations(&game, "a1").len(), 17);
    }

    #[test]
    fn king_steps_one_square() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/3P4/4K3 w - -").unwrap();
        assert_eq!(destinations(&game, "e1"), vec!["d1", "e2", "f1", "f2"]);
    }
}
