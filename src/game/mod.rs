//! The Game State Machine: turn handling, special-move side effects,
//! draw and mate detection, history and FEN.
//!
//! # Example
//! ```
//! use chess_arbiter::game::{Game, START_FEN};
//!
//! let mut game = Game::new();
//! game.play("e2e4".parse().unwrap()).unwrap();
//! assert_ne!(game.to_fen(), START_FEN);
//! ```

mod config;
mod error;
mod fen;
mod history;
mod material;
mod outcome;
mod state;

#[cfg(test)]
mod tests;

pub use config::{RulesConfig, DEFAULT_FIFTY_MOVE_THRESHOLD};
pub use error::MoveRejection;
pub use fen::{parse_fen, to_fen, START_FEN};
pub use outcome::{DrawReason, GameEvent, GameResult, GameStatus, MoveReport};
pub use state::{Game, PositionToken};
