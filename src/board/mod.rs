//! Board representation and the chess rules that only need the board.
//!
//! The [`Board`] is the Position Store. Move generation, attack detection
//! and the legality filter are implemented as methods on it, split across
//! modules by concern.
//!
//! # Example
//! ```
//! use chess_arbiter::board::{Board, Color};
//!
//! let mut board = Board::new();
//! let moves = board.legal_moves(Color::White, None);
//! assert_eq!(moves.len(), 20);
//! ```

mod attacks;
mod error;
mod execute;
mod journal;
mod legality;
mod movegen;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{BoardError, FenError, MoveParseError, SquareError};
pub use execute::MoveEffects;
pub use journal::Journal;
pub use state::Board;
pub use types::{CastleSide, Color, Move, Piece, PieceId, PieceKind, Square};

pub(crate) use execute::execute;
