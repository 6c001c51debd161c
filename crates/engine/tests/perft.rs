//! Perft node counts against published reference values.

use chess_engine::perft::{perft, PERFT_POSITIONS};
use chess_engine::GameState;

fn check_position(index: usize, max_depth: u32) {
    let case = &PERFT_POSITIONS[index];
    let mut game = GameState::from_fen(case.fen).unwrap();

    for &(depth, expected) in case.expected_results.iter().filter(|(d, _)| *d <= max_depth) {
        assert_eq!(perft(&mut game, depth), expected, "{} depth {}", case.name, depth);
    }
}

#[test]
fn perft_starting_position() {
    check_position(0, 3);
}

#[test]
fn perft_kiwipete() {
    check_position(1, 2);
}

#[test]
fn perft_position_3() {
    check_position(2, 3);
}

#[test]
fn perft_position_6() {
    check_position(3, 2);
}

#[test]
#[ignore = "slow without optimisations"]
fn perft_full_tables() {
    for index in 0..PERFT_POSITIONS.len() {
        check_position(index, u32::MAX);
    }
}

#[test]
fn perft_leaves_the_game_untouched() {
    let mut game = GameState::from_fen(PERFT_POSITIONS[1].fen).unwrap();
    let board = game.board().clone();
    let rights = game.castling_rights();

    perft(&mut game, 2);

    assert_eq!(game.board(), &board);
    assert_eq!(game.castling_rights(), rights);
    assert!(game.move_log().is_empty());
}
