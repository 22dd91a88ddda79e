//! Core chess types.
//!
//! - `PieceKind`, `Color`, `Piece`, `PieceId` - pieces and their identity
//! - `Square` - bounds-checked board coordinate
//! - `Move` and `CastleSide` - move representation

mod moves;
mod piece;
mod square;

pub use moves::{CastleSide, Move};
pub use piece::{Color, Piece, PieceId, PieceKind};
pub use square::Square;
