//! Move type and its long-algebraic text form.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::PieceKind;
use super::square::Square;
use crate::board::error::MoveParseError;

/// A requested or generated move.
///
/// Equality is structural over `from`, `to` and `promotion`; special-move
/// kinds (castling, en passant) are derived from the board when the move is
/// executed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_promotion(self, promotion: Option<PieceKind>) -> Self {
        Move {
            from: self.from,
            to: self.to,
            promotion,
        }
    }

    /// True when the move covers two ranks along one file (a pawn double push shape)
    #[inline]
    #[must_use]
    pub fn is_double_step(&self) -> bool {
        self.from.file() == self.to.file() && self.from.rank().abs_diff(self.to.rank()) == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    /// Parse UCI long algebraic notation (`e2e4`, `e7e8q`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: s.len() });
        }
        let invalid = || MoveParseError::InvalidSquare {
            notation: s.to_string(),
        };
        let from: Square = s[0..2].parse().map_err(|_| invalid())?;
        let to: Square = s[2..4].parse().map_err(|_| invalid())?;

        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => {
                let kind = PieceKind::from_char(c)
                    .filter(|k| k.is_promotion_target())
                    .ok_or(MoveParseError::InvalidPromotion { char: c })?;
                Some(kind)
            }
        };

        Ok(Move {
            from,
            to,
            promotion,
        })
    }
}

/// Which wing a king castles towards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// File the rook starts on
    #[inline]
    #[must_use]
    pub const fn rook_file(self) -> u8 {
        match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }

    /// File the king lands on
    #[inline]
    #[must_use]
    pub const fn king_target_file(self) -> u8 {
        match self {
            CastleSide::KingSide => 6,
            CastleSide::QueenSide => 2,
        }
    }

    /// File the rook lands on
    #[inline]
    #[must_use]
    pub const fn rook_target_file(self) -> u8 {
        match self {
            CastleSide::KingSide => 5,
            CastleSide::QueenSide => 3,
        }
    }

    /// Castling side implied by a king move, if it is a two-file king step
    #[must_use]
    pub fn from_king_move(from: Square, to: Square) -> Option<CastleSide> {
        if from.rank() != to.rank() || from.file() != 4 {
            return None;
        }
        match to.file() {
            6 => Some(CastleSide::KingSide),
            2 => Some(CastleSide::QueenSide),
            _ => None,
        }
    }
}
