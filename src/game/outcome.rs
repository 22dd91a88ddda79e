//! Game results, status and the notifications a move produces.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{CastleSide, Color, Move, PieceKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    /// The same position occurred for the third time
    Repetition,
    /// The halfmove clock reached the configured threshold
    MoveLimit,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::Repetition => "threefold repetition",
            DrawReason::MoveLimit => "the fifty-move rule",
        };
        f.write_str(reason)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameResult {
    Checkmate { winner: Color },
    Draw(DrawReason),
}

impl GameResult {
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        match self {
            GameResult::Checkmate { winner } => Some(*winner),
            GameResult::Draw(_) => None,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Checkmate { winner } => write!(f, "{winner} wins by checkmate"),
            GameResult::Draw(reason) => write!(f, "Draw by {reason}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameStatus {
    AwaitingMove(Color),
    Ended(GameResult),
}

/// Notifications for whoever presents the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameEvent {
    SideToMoveChanged(Color),
    /// The named side's king is in check
    CheckAsserted(Color),
    GameEnded(GameResult),
}

/// Everything an accepted move did.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveReport {
    /// The move as played, with the promotion choice resolved
    pub played: Move,
    pub mover: Color,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    /// The opponent is now in check
    pub check: bool,
    pub castle: Option<CastleSide>,
    pub promotion: Option<PieceKind>,
    pub en_passant: bool,
    pub events: Vec<GameEvent>,
}

impl MoveReport {
    /// The result, if this move ended the game
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.events.iter().find_map(|event| match event {
            GameEvent::GameEnded(result) => Some(*result),
            _ => None,
        })
    }
}
