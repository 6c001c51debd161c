use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::game_move::Move;
use crate::types::GameStatus;

/// In-memory game log, flushed to a timestamped text file on request.
#[derive(Debug)]
pub struct GameLogger {
    pub log_buffer: String,
    pub verbose: bool,
    ply_count: u32,
}

impl GameLogger {
    pub fn new() -> Self {
        let mut logger = Self {
            log_buffer: String::with_capacity(64 * 1024),
            verbose: false,
            ply_count: 0,
        };

        logger.log("=== Chess Game Log Started ===");
        logger.log(&format!("Date: {}", chrono::Local::now().format("%m/%d/%Y %H:%M:%S")));
        logger
    }

    pub fn enable_verbose(&mut self) {
        self.verbose = true;
        self.log("Verbose logging enabled - valid move lists will be recorded");
    }

    pub fn disable_verbose(&mut self) {
        self.verbose = false;
        self.log("Verbose logging disabled");
    }

    /// Mark the start of a new game; move numbering restarts at 1.
    pub fn new_game(&mut self) {
        self.ply_count = 0;
        self.log("=== New Game ===");
    }

    pub fn log(&mut self, message: &str) {
        self.log_buffer.push_str(message);
        self.log_buffer.push('\n');
    }

    pub fn log_move(&mut self, mv: &Move, elapsed_ms: i64) {
        self.ply_count += 1;
        let mut line = format!("{}. {} ({}ms)", self.ply_count, mv, elapsed_ms);
        if mv.is_castle() {
            line.push_str(" castle");
        }
        if mv.is_en_passant() {
            line.push_str(" en passant");
        }
        if mv.is_pawn_promotion() {
            line.push_str(" =Q");
        }
        if let Some(captured) = mv.piece_captured() {
            line.push_str(&format!(" x{}", captured));
        }
        self.log(&line);
    }

    pub fn log_undo(&mut self, mv: &Move) {
        self.ply_count = self.ply_count.saturating_sub(1);
        self.log(&format!("UNDO: {}", mv));
    }

    pub fn log_status(&mut self, status: GameStatus) {
        match status {
            GameStatus::InProgress => {}
            GameStatus::Check(color) => self.log(&format!("{} is in check", color)),
            GameStatus::Checkmate(color) => {
                self.log(&format!("Checkmate - {} wins", color.opposite()))
            }
            GameStatus::Stalemate => self.log("Stalemate"),
        }
    }

    /// Only recorded in verbose mode.
    pub fn log_valid_moves(&mut self, moves: &[Move]) {
        if !self.verbose {
            return;
        }
        let names: Vec<String> = moves.iter().map(|mv| mv.notation()).collect();
        self.log(&format!("Valid moves ({}): {}", moves.len(), names.join(" ")));
    }

    /// Write the log to `<dir>/<timestamp>.txt` and return the path.
    pub fn save_to_file(&mut self, dir: impl AsRef<Path>, reason: &str) -> io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let now = chrono::Local::now();
        let path = dir.join(format!("{}.txt", now.format("%m_%d_%Y_%H_%M_%S")));

        self.log(&format!("Game ended: {} - saving log", reason));

        let mut file = File::create(&path)?;
        file.write_all(self.log_buffer.as_bytes())?;
        Ok(path)
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameState;
    use crate::types::Color;

    #[test]
    fn moves_are_numbered_and_undo_rewinds() {
        let mut game = GameState::new();
        let mut logger = GameLogger::new();

        let e4 = game.try_make_move("e2".parse().unwrap(), "e4".parse().unwrap()).unwrap();
        logger.log_move(&e4, 12);
        logger.log_undo(&e4);
        logger.log_move(&e4, 3);

        assert!(logger.log_buffer.contains("1. e2e4 (12ms)"));
        assert!(logger.log_buffer.contains("UNDO: e2e4"));
        assert!(logger.log_buffer.contains("1. e2e4 (3ms)"));
    }

    #[test]
    fn new_game_restarts_numbering() {
        let mut game = GameState::new();
        let mut logger = GameLogger::new();

        let e4 = game.try_make_move("e2".parse().unwrap(), "e4".parse().unwrap()).unwrap();
        let e5 = game.try_make_move("e7".parse().unwrap(), "e5".parse().unwrap()).unwrap();
        logger.log_move(&e4, 5);
        logger.log_move(&e5, 5);

        logger.new_game();
        logger.log_move(&e4, 7);

        assert!(logger.log_buffer.contains("=== New Game ==="));
        assert!(logger.log_buffer.contains("1. e2e4 (7ms)"));
        assert!(!logger.log_buffer.contains("3. e2e4"));
    }

    #[test]
    fn valid_moves_only_in_verbose_mode() {
        let mut game = GameState::new();
        let moves = game.get_valid_moves();
        let mut logger = GameLogger::new();

        logger.log_valid_moves(&moves);
        assert!(!logger.log_buffer.contains("Valid moves"));

        logger.enable_verbose();
        logger.log_valid_moves(&moves);
        assert!(logger.log_buffer.contains("Valid moves (20)"));
    }

    #[test]
    fn status_lines() {
        let mut logger = GameLogger::new();
        logger.log_status(GameStatus::Checkmate(Color::White));
        logger.log_status(GameStatus::Stalemate);
        assert!(logger.log_buffer.contains("Checkmate - Black wins"));
        assert!(logger.log_buffer.contains("Stalemate"));
    }

    #[test]
    fn saves_to_the_given_directory() {
        let dir = std::env::temp_dir().join(format!("chess_engine_log_{}", std::process::id()));
        let mut logger = GameLogger::new();
        let path = logger.save_to_file(&dir, "test").unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Game ended: test"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
