//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - move generation node counts on known positions
//! - `rollback.rs` - simulated moves leave the board untouched
//! - `edge_cases.rs` - pins, double checks and special-move corner cases
//! - `proptest.rs` - property-based tests over random games

mod proptest;

use crate::board::{Board, Color, Move, Square};
use crate::game::parse_fen;

pub(super) fn sq(s: &str) -> Square {
    s.parse().expect("valid square")
}

/// Board, side to move and last move of a FEN position.
pub(super) fn position(fen: &str) -> (Board, Color, Option<Move>) {
    let game = parse_fen(fen).expect("valid FEN");
    (game.board().clone(), game.side_to_move(), game.last_move())
}
