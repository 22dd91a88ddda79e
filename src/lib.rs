//! Chess rules engine with an external UCI engine opponent.
//!
//! - [`board`] - the Position Store, move generation and legality
//! - [`game`] - the Game State Machine and FEN
//! - [`engine`] - UCI subprocess client and its worker thread
//! - [`session`] - a game wired to an engine opponent

pub mod board;
pub mod engine;
pub mod game;
pub mod logging;
pub mod session;
pub mod sync;
pub mod zobrist;

pub use board::{Board, Color, Move, Piece, PieceKind, Square};
pub use game::{Game, GameResult, MoveRejection, MoveReport};
pub use session::{EngineTurn, Session, SessionConfig};
