use super::GameState;
use crate::error::{ChessError, Result};
use crate::game_move::Move;
use crate::types::*;

impl GameState {
    /// Apply a move.
    ///
    /// Precondition: `mv` was taken from the latest `get_valid_moves()` of
    /// this position. Nothing is re-validated here; use `try_make_move` when
    /// the move comes from untrusted input.
    pub fn make_move(&mut self, mv: Move) {
        let mover = mv.piece_moved();

        self.board.set(mv.start(), None);
        self.board.set(mv.end(), Some(mover));
        self.move_log.push(mv);
        self.side_to_move = self.side_to_move.opposite();

        if mover.kind == PieceKind::King {
            self.set_king_location(mover.color, mv.end());
        }

        // Promotion is always to a queen
        if mv.is_pawn_promotion() {
            self.board
                .set(mv.end(), Some(Piece::new(mover.color, PieceKind::Queen)));
        }

        if mv.is_en_passant() {
            self.board.set(Square::at(mv.start().row(), mv.end().col()), None);
        }

        self.en_passant_target = double_step_target(&mv);

        if let Some((rook_from, rook_to)) = castle_rook_squares(&mv) {
            let rook = self.board.get(rook_from);
            self.board.set(rook_to, rook);
            self.board.set(rook_from, None);
        }

        self.update_castling_rights(&mv);
        self.castling_rights_log.push(self.castling_rights);
        self.en_passant_log.push(self.en_passant_target);
    }

    /// Take back the last move. Returns `None`, touching nothing, when the
    /// log is empty.
    pub fn undo_move(&mut self) -> Option<Move> {
        let mv = self.move_log.pop()?;
        let mover = mv.piece_moved();

        self.board.set(mv.start(), Some(mover));
        self.board.set(mv.end(), mv.piece_captured());
        self.side_to_move = self.side_to_move.opposite();

        if mover.kind == PieceKind::King {
            self.set_king_location(mover.color, mv.start());
        }

        // The captured pawn sat beside the landing square, not on it
        if mv.is_en_passant() {
            self.board.set(mv.end(), None);
            self.board
                .set(Square::at(mv.start().row(), mv.end().col()), mv.piece_captured());
        }

        if let Some((rook_from, rook_to)) = castle_rook_squares(&mv) {
            let rook = self.board.get(rook_to);
            self.board.set(rook_from, rook);
            self.board.set(rook_to, None);
        }

        self.castling_rights_log.pop();
        if let Some(&rights) = self.castling_rights_log.last() {
            self.castling_rights = rights;
        }
        self.en_passant_log.pop();
        if let Some(&target) = self.en_passant_log.last() {
            self.en_passant_target = target;
        }

        Some(mv)
    }

    /// Checked entry point for a move given as two squares: applies it only
    /// if it is among the current valid moves, and returns the flagged move
    /// that was played.
    pub fn try_make_move(&mut self, start: Square, end: Square) -> Result<Move> {
        let requested = Move::new(start, end, &self.board)?;
        let legal = self
            .get_valid_moves()
            .into_iter()
            .find(|mv| *mv == requested)
            .ok_or_else(|| ChessError::IllegalMove(requested.notation()))?;

        self.make_move(legal);
        Ok(legal)
    }

    /// Any king move clears both wings; a rook leaving or captured on its
    /// corner clears that wing.
    fn update_castling_rights(&mut self, mv: &Move) {
        let mover = mv.piece_moved();
        match mover.kind {
            PieceKind::King => self.castling_rights.remove_all(mover.color),
            PieceKind::Rook => {
                if let Some(side) = corner_side(mover.color, mv.start()) {
                    self.castling_rights.remove(mover.color, side);
                }
            }
            _ => {}
        }

        if let Some(captured) = mv.piece_captured() {
            if captured.kind == PieceKind::Rook {
                if let Some(side) = corner_side(captured.color, mv.end()) {
                    self.castling_rights.remove(captured.color, side);
                }
            }
        }
    }
}

/// The wing whose rook starts on `square`, if it is one of `color`'s corners.
fn corner_side(color: Color, square: Square) -> Option<CastleSide> {
    let home_row = color.back_row();
    if square == Square::at(home_row, 0) {
        Some(CastleSide::Queenside)
    } else if square == Square::at(home_row, 7) {
        Some(CastleSide::Kingside)
    } else {
        None
    }
}

/// The square skipped by a two-row pawn advance.
fn double_step_target(mv: &Move) -> Option<Square> {
    if mv.piece_moved().kind != PieceKind::Pawn {
        return None;
    }
    let (from_row, to_row) = (mv.start().row(), mv.end().row());
    if from_row.abs_diff(to_row) != 2 {
        return None;
    }
    Some(Square::at((from_row + to_row) / 2, mv.start().col()))
}

/// Corner and landing square of the rook for a castle move.
fn castle_rook_squares(mv: &Move) -> Option<(Square, Square)> {
    let row = mv.end().row();
    let king_col = mv.end().col();
    match mv.castle_side()? {
        CastleSide::Kingside => Some((Square::at(row, king_col + 1), Square::at(row, king_col - 1))),
        CastleSide::Queenside => Some((Square::at(row, king_col - 2), Square::at(row, king_col + 1))),
    }
}
