use super::moves::{BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS};
use super::GameState;
use crate::game_move::Move;
use crate::types::*;

const KINGSIDE_BETWEEN: &[u8] = &[5, 6];
const QUEENSIDE_BETWEEN: &[u8] = &[1, 2, 3];

impl GameState {
    /// All legal moves for the side to move, castles included.
    ///
    /// Also refreshes the checkmate/stalemate flags. Those flags describe the
    /// position as of this call only: call again after every make or undo.
    pub fn get_valid_moves(&mut self) -> Vec<Move> {
        let saved_en_passant = self.en_passant_target;
        let saved_rights = self.castling_rights;

        let mut moves = self.get_all_possible_moves();
        moves.extend(self.get_castle_moves());
        moves.retain(|&mv| self.leaves_king_safe(mv));

        self.en_passant_target = saved_en_passant;
        self.castling_rights = saved_rights;

        if moves.is_empty() {
            let in_check = self.in_check();
            self.checkmate = in_check;
            self.stalemate = !in_check;
        } else {
            self.checkmate = false;
            self.stalemate = false;
        }

        moves
    }

    /// Legal moves of the piece standing on `square`.
    pub fn valid_moves_from(&mut self, square: Square) -> Vec<Move> {
        self.get_valid_moves()
            .into_iter()
            .filter(|mv| mv.start() == square)
            .collect()
    }

    /// Probe a candidate with make/undo and check the mover's own king.
    fn leaves_king_safe(&mut self, mv: Move) -> bool {
        let mover = mv.piece_moved().color;
        self.make_move(mv);
        let safe = !self.square_under_attack(self.king_location(mover), mover.opposite());
        self.undo_move();
        safe
    }

    /// Whether the side to move has its king attacked.
    pub fn in_check(&self) -> bool {
        let color = self.side_to_move;
        self.square_under_attack(self.king_location(color), color.opposite())
    }

    /// Whether any piece of `by` attacks `square`.
    ///
    /// Pawns attack their forward diagonals whether or not anything stands
    /// there; pawn pushes never attack.
    pub fn square_under_attack(&self, square: Square, by: Color) -> bool {
        self.attacked_by_slider(square, by)
            || self.attacked_by_stepper(square, by, &KNIGHT_OFFSETS, PieceKind::Knight)
            || self.attacked_by_stepper(square, by, &KING_OFFSETS, PieceKind::King)
            || self.attacked_by_pawn(square, by)
    }

    fn attacked_by_slider(&self, square: Square, by: Color) -> bool {
        let rays = ROOK_DIRECTIONS
            .iter()
            .map(|&dir| (dir, PieceKind::Rook))
            .chain(BISHOP_DIRECTIONS.iter().map(|&dir| (dir, PieceKind::Bishop)));

        for ((d_row, d_col), slider) in rays {
            let mut current = square;
            while let Some(next) = current.offset(d_row, d_col) {
                if let Some(piece) = self.board.get(next) {
                    if piece.color == by && (piece.kind == slider || piece.kind == PieceKind::Queen) {
                        return true;
                    }
                    break;
                }
                current = next;
            }
        }

        false
    }

    fn attacked_by_stepper(
        &self,
        square: Square,
        by: Color,
        offsets: &[(i8, i8)],
        kind: PieceKind,
    ) -> bool {
        offsets.iter().any(|&(d_row, d_col)| {
            square
                .offset(d_row, d_col)
                .and_then(|from| self.board.get(from))
                .is_some_and(|piece| piece.is(by, kind))
        })
    }

    fn attacked_by_pawn(&self, square: Square, by: Color) -> bool {
        // Look backwards along the attacker's direction of travel
        let back = -by.pawn_direction();
        [-1, 1].iter().any(|&d_col| {
            square
                .offset(back, d_col)
                .and_then(|from| self.board.get(from))
                .is_some_and(|piece| piece.is(by, PieceKind::Pawn))
        })
    }

    /// Castle moves for the side to move. Empty while in check.
    pub fn get_castle_moves(&self) -> Vec<Move> {
        let color = self.side_to_move;
        let king = self.king_location(color);

        if self.square_under_attack(king, color.opposite()) {
            return Vec::new();
        }

        [CastleSide::Kingside, CastleSide::Queenside]
            .into_iter()
            .filter_map(|side| self.castle_move(king, color, side))
            .collect()
    }

    fn castle_move(&self, king: Square, color: Color, side: CastleSide) -> Option<Move> {
        if !self.castling_rights.has(color, side) {
            return None;
        }

        let row = color.back_row();
        if king != Square::at(row, 4) {
            return None;
        }

        // (rook corner, squares that must be empty, squares the king crosses)
        let (rook_col, between, king_path): (u8, &[u8], [u8; 2]) = match side {
            CastleSide::Kingside => (7, KINGSIDE_BETWEEN, [5, 6]),
            CastleSide::Queenside => (0, QUEENSIDE_BETWEEN, [3, 2]),
        };

        let rook = Square::at(row, rook_col);
        if self.board.get(rook) != Some(Piece::new(color, PieceKind::Rook)) {
            return None;
        }

        if between.iter().any(|&col| !self.board.is_empty(Square::at(row, col))) {
            return None;
        }

        let opponent = color.opposite();
        if king_path
            .iter()
            .any(|&col| self.square_under_attack(Square::at(row, col), opponent))
        {
            return None;
        }

        // Destination is two columns toward the rook
        let end = Square::at(row, king_path[1]);
        let king_piece = self.board.get(king)?;
        Some(Move::with_piece(king, end, king_piece, &self.board, false, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn notations(moves: &[Move]) -> Vec<String> {
        let mut names: Vec<String> = moves.iter().map(|mv| mv.notation()).collect();
        names.sort();
        names
    }

    #[test]
    fn twenty_legal_moves_at_the_start() {
        let mut game = GameState::new();
        let moves = game.get_valid_moves();
        assert_eq!(moves.len(), 20);
        assert_eq!(moves.iter().filter(|mv| mv.piece_moved().kind == PieceKind::Pawn).count(), 16);
        assert!(!game.is_checkmate() && !game.is_stalemate());
    }

    #[test]
    fn pinned_piece_cannot_leave_the_pin() {
        let mut game = GameState::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - -").unwrap();
        let moves = game.get_valid_moves();
        assert!(moves.iter().all(|mv| mv.start() != sq("e2")));
    }

    #[test]
    fn attack_detection_by_piece_type() {
        let game = GameState::from_fen("4k3/8/8/3p4/8/5n2/8/R3K2B w - -").unwrap();
        // Black pawn on d5 hits c4 and e4 but not d4
        assert!(game.square_under_attack(sq("c4"), Color::Black));
        assert!(game.square_under_attack(sq("e4"), Color::Black));
        assert!(!game.square_under_attack(sq("d4"), Color::Black));
        // Knight on f3
        assert!(game.square_under_attack(sq("e1"), Color::Black));
        assert!(game.square_under_attack(sq("g1"), Color::Black));
        // Rook ray along the first rank stops at the king
        assert!(game.square_under_attack(sq("b1"), Color::White));
        assert!(!game.square_under_attack(sq("g1"), Color::White));
        // Bishop on h1 reaches the knight on f3 and no further
        assert!(game.square_under_attack(sq("g2"), Color::White));
        assert!(game.square_under_attack(sq("f3"), Color::White));
        assert!(!game.square_under_attack(sq("e4"), Color::White));
    }

    #[test]
    fn no_castling_out_of_check() {
        let game = GameState::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ -").unwrap();
        assert!(game.in_check());
        assert!(game.get_castle_moves().is_empty());
    }

    #[test]
    fn no_castling_through_an_attacked_square() {
        let game = GameState::from_fen("5rk1/8/8/8/8/8/8/R3K2R w KQ -").unwrap();
        let castles = notations(&game.get_castle_moves());
        assert_eq!(castles, vec!["e1c1"]);
    }

    #[test]
    fn queenside_b_file_may_be_attacked() {
        let game = GameState::from_fen("1r4k1/8/8/8/8/8/8/R3K3 w Q -").unwrap();
        let castles = game.get_castle_moves();
        assert_eq!(notations(&castles), vec!["e1c1"]);
        assert_eq!(castles[0].castle_side(), Some(CastleSide::Queenside));
    }

    #[test]
    fn pawn_attack_on_an_empty_transit_square_blocks_castling() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/6p1/4K2R w K -").unwrap();
        assert!(game.get_castle_moves().is_empty());
    }

    #[test]
    fn castling_needs_its_rook_in_the_corner() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w KQ -").unwrap();
        assert!(game.get_castle_moves().is_empty());
    }

    #[test]
    fn castling_needs_empty_squares_between() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ -").unwrap();
        assert!(game.get_castle_moves().is_empty());
    }

    #[test]
    fn valid_moves_restore_transient_state() {
        let mut game = GameState::from_fen("r3k2r/8/8/3pP3/8/8/8/R3K2R w KQkq d6").unwrap();
        let board = game.board().clone();
        let moves = game.get_valid_moves();
        assert!(moves.iter().any(|mv| mv.is_en_passant()));
        assert_eq!(moves.iter().filter(|mv| mv.is_castle()).count(), 2);
        assert_eq!(game.board(), &board);
        assert_eq!(game.en_passant_target(), Some(sq("d6")));
        assert_eq!(game.castling_rights(), CastlingRights::ALL);
        assert!(game.move_log().is_empty());
    }

    #[test]
    fn valid_moves_from_one_square() {
        let mut game = GameState::new();
        assert_eq!(notations(&game.valid_moves_from(sq("g1"))), vec!["g1f3", "g1h3"]);
        assert!(game.valid_moves_from(sq("e1")).is_empty());
    }
}
