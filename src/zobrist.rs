//! Zobrist fingerprints for repetition detection.
//!
//! A fingerprint covers piece placement and side to move only. Clocks,
//! castling availability and en passant are deliberately left out, so two
//! positions that look the same on the board compare equal.

use std::fmt;

use once_cell::sync::Lazy;
use rand::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Board, Color};

struct ZobristKeys {
    // piece_keys[kind][color][square]
    piece_keys: [[[u64; 64]; 2]; 6],
    black_to_move_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x00C0_FFEE_u64);
        let mut piece_keys = [[[0; 64]; 2]; 6];
        for kind in &mut piece_keys {
            for color in kind.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        ZobristKeys {
            piece_keys,
            black_to_move_key: rng.gen(),
        }
    }
}

static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

/// A 64-bit position fingerprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Fingerprint of `board` with `side_to_move` to play.
    #[must_use]
    pub fn of(board: &Board, side_to_move: Color) -> Self {
        let keys = &*ZOBRIST;
        let mut hash = board.occupied().fold(0u64, |acc, (sq, piece)| {
            acc ^ keys.piece_keys[piece.kind().index()][piece.color().index()][sq.index()]
        });
        if side_to_move == Color::Black {
            hash ^= keys.black_to_move_key;
        }
        Fingerprint(hash)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
