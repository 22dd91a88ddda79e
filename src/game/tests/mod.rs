//! Game-level tests.
//!
//! - `scenarios.rs` - move acceptance, rejection and special moves
//! - `draw.rs` - draw detection (fifty-move rule, repetition, material)


use crate::board::{Move, Square};
use crate::game::{Game, MoveReport};

pub(super) fn sq(s: &str) -> Square {
    s.parse().expect("valid square")
}

/// Play a UCI move that must be accepted.
pub(super) fn apply_uci(game: &mut Game, uci: &str) -> MoveReport {
    let mv: Move = uci.parse().expect("valid uci text");
    game.play(mv)
        .unwrap_or_else(|err| panic!("{uci} rejected: {err}"))
}

pub(super) fn apply_all(game: &mut Game, moves: &[&str]) {
    for uci in moves {
        apply_uci(game, uci);
    }
}
