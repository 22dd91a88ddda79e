use std::fmt;

use crate::board::{Color, PieceKind, Square};

/// Why a requested move was refused. A rejected move leaves the game untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRejection {
    /// The game has already ended
    GameOver,
    NoPieceAt { square: Square },
    /// The piece on `square` belongs to the side not on move
    WrongColor { square: Square, color: Color },
    /// The piece cannot move from `from` to `to` by its movement rules
    NotAPieceMove { from: Square, to: Square },
    /// Promotion to a pawn or king was requested
    InvalidPromotion { kind: PieceKind },
    /// A promotion piece was given for a move that does not promote
    UnexpectedPromotion,
    /// The move would leave the mover's own king attacked
    LeavesKingInCheck,
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRejection::GameOver => write!(f, "The game is over"),
            MoveRejection::NoPieceAt { square } => write!(f, "No piece on {square}"),
            MoveRejection::WrongColor { square, color } => {
                write!(f, "The piece on {square} is {color}, but it is not {color}'s turn")
            }
            MoveRejection::NotAPieceMove { from, to } => {
                write!(f, "The piece on {from} cannot move to {to}")
            }
            MoveRejection::InvalidPromotion { kind } => {
                write!(f, "Cannot promote to a {kind}")
            }
            MoveRejection::UnexpectedPromotion => {
                write!(f, "Promotion given for a move that does not promote")
            }
            MoveRejection::LeavesKingInCheck => write!(f, "Move would leave the king in check"),
        }
    }
}

impl std::error::Error for MoveRejection {}
