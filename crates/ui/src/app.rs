use chrono::{DateTime, Local};
use chess_engine::{Color, GameLogger, GameState, GameStatus, Move, Piece, PieceKind, Square};
use egui::{Color32, Rect, Sense, Vec2};

const LIGHT_SQUARE: Color32 = Color32::from_rgb(240, 217, 181);
const DARK_SQUARE: Color32 = Color32::from_rgb(181, 136, 99);
const SELECTED_SQUARE: Color32 = Color32::from_rgb(255, 255, 0);
const LOG_DIR: &str = "logs";

pub struct ChessApp {
    game: GameState,
    valid_moves: Vec<Move>,
    selected_square: Option<Square>,
    status: GameStatus,
    logger: GameLogger,
    last_move_at: DateTime<Local>,
}

impl ChessApp {
    pub fn new() -> Self {
        let mut app = Self {
            game: GameState::new(),
            valid_moves: Vec::new(),
            selected_square: None,
            status: GameStatus::InProgress,
            logger: GameLogger::new(),
            last_move_at: Local::now(),
        };
        app.refresh();
        app
    }

    /// Re-query the engine after every mutation.
    fn refresh(&mut self) {
        self.valid_moves = self.game.get_valid_moves();
        self.status = self.game.status();
        self.logger.log_status(self.status);
        self.logger.log_valid_moves(&self.valid_moves);
    }

    fn play(&mut self, mv: Move) {
        let now = Local::now();
        self.game.make_move(mv);
        self.logger.log_move(&mv, (now - self.last_move_at).num_milliseconds());
        self.last_move_at = now;
        self.selected_square = None;
        self.refresh();
    }

    fn undo(&mut self) {
        if let Some(mv) = self.game.undo_move() {
            self.logger.log_undo(&mv);
            self.selected_square = None;
            self.refresh();
        }
    }

    fn restart(&mut self) {
        self.logger.new_game();
        self.game = GameState::new();
        self.selected_square = None;
        self.last_move_at = Local::now();
        self.refresh();
    }

    fn handle_square_click(&mut self, clicked: Square) {
        if self.selected_square == Some(clicked) {
            self.selected_square = None;
            return;
        }

        if let Some(selected) = self.selected_square {
            // The valid-move list is the only legality oracle
            let chosen = self
                .valid_moves
                .iter()
                .copied()
                .find(|mv| mv.start() == selected && mv.end() == clicked);
            if let Some(mv) = chosen {
                self.play(mv);
                return;
            }
        }

        if self.game.board().color_at(clicked) == Some(self.game.side_to_move()) {
            self.selected_square = Some(clicked);
        } else {
            self.selected_square = None;
        }
    }

    fn highlighted_targets(&self) -> Vec<Square> {
        match self.selected_square {
            Some(selected) => self
                .valid_moves
                .iter()
                .filter(|mv| mv.start() == selected)
                .map(|mv| mv.end())
                .collect(),
            None => Vec::new(),
        }
    }

    fn status_text(&self) -> String {
        match self.status {
            GameStatus::InProgress => format!("{} to move", self.game.side_to_move()),
            GameStatus::Check(color) => format!("{} to move - check!", color),
            GameStatus::Checkmate(color) => format!("Checkmate - {} wins", color.opposite()),
            GameStatus::Stalemate => "Stalemate".to_string(),
        }
    }
}

impl Default for ChessApp {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ChessApp {
    fn drop(&mut self) {
        match self.logger.save_to_file(LOG_DIR, "window closed") {
            Ok(path) => println!("Game log saved to {}", path.display()),
            Err(err) => eprintln!("Failed to save game log: {}", err),
        }
    }
}

impl eframe::App for ChessApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (undo_pressed, restart_pressed) =
            ctx.input(|i| (i.key_pressed(egui::Key::Z), i.key_pressed(egui::Key::R)));
        if undo_pressed {
            self.undo();
        }
        if restart_pressed {
            self.restart();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.status_text());
                if ui.button("Undo (Z)").clicked() {
                    self.undo();
                }
                if ui.button("New game (R)").clicked() {
                    self.restart();
                }
            });

            let available_size = ui.available_size();
            let board_size = available_size.x.min(available_size.y) - 20.0;
            let square_size = board_size / 8.0;

            let board_rect = Rect::from_min_size(ui.cursor().min, Vec2::splat(board_size));
            let response = ui.allocate_rect(board_rect, Sense::click());

            if response.clicked() && !self.status.is_over() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let relative = pos - board_rect.min;
                    let row = (relative.y / square_size) as i32;
                    let col = (relative.x / square_size) as i32;
                    if let Ok(square) = Square::new(row, col) {
                        self.handle_square_click(square);
                    }
                }
            }

            self.draw_board(ui, board_rect, square_size);
        });
    }
}

impl ChessApp {
    fn draw_board(&self, ui: &mut egui::Ui, board_rect: Rect, square_size: f32) {
        let painter = ui.painter();
        let targets = self.highlighted_targets();

        // Row 0 is drawn at the top, so white sits at the bottom
        for square in Square::all() {
            let (row, col) = (square.row(), square.col());
            let square_rect = Rect::from_min_size(
                board_rect.min + Vec2::new(col as f32 * square_size, row as f32 * square_size),
                Vec2::splat(square_size),
            );

            let square_color = if Some(square) == self.selected_square {
                SELECTED_SQUARE
            } else if (row + col) % 2 == 0 {
                LIGHT_SQUARE
            } else {
                DARK_SQUARE
            };
            painter.rect_filled(square_rect, 0.0, square_color);

            let piece = self.game.board().get(square);
            if targets.contains(&square) {
                let center = square_rect.center();
                let hint = Color32::from_rgba_premultiplied(128, 128, 128, 179);
                if piece.is_some() {
                    painter.circle_filled(center, square_size * 0.4, hint);
                    painter.circle_filled(center, square_size * 0.25, square_color);
                } else {
                    painter.circle_filled(center, square_size * 0.15, hint);
                }
            }

            if let Some(piece) = piece {
                draw_piece(painter, piece, square_rect);
            }
        }

        painter.rect_stroke(board_rect, 0.0, egui::Stroke::new(2.0, Color32::BLACK));
    }
}

fn draw_piece(painter: &egui::Painter, piece: Piece, square_rect: Rect) {
    let glyph = match (piece.kind, piece.color) {
        (PieceKind::King, Color::White) => "♔",
        (PieceKind::Queen, Color::White) => "♕",
        (PieceKind::Rook, Color::White) => "♖",
        (PieceKind::Bishop, Color::White) => "♗",
        (PieceKind::Knight, Color::White) => "♘",
        (PieceKind::Pawn, Color::White) => "♙",
        (PieceKind::King, Color::Black) => "♚",
        (PieceKind::Queen, Color::Black) => "♛",
        (PieceKind::Rook, Color::Black) => "♜",
        (PieceKind::Bishop, Color::Black) => "♝",
        (PieceKind::Knight, Color::Black) => "♞",
        (PieceKind::Pawn, Color::Black) => "♟",
    };

    painter.text(
        square_rect.center(),
        egui::Align2::CENTER_CENTER,
        glyph,
        egui::FontId::proportional(square_rect.width() * 0.8),
        Color32::BLACK,
    );
}
