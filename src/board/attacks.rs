//! Attack detection.
//!
//! Attack patterns only: pawns attack diagonally whether or not the target
//! is occupied, pawn pushes never attack, and castling is not considered.

use super::movegen::{BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS};
use super::{Board, Color, PieceKind, Square};

impl Board {
    /// True iff some piece of `by` attacks `square`.
    #[must_use]
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        let holds = |sq: Option<Square>, kind: PieceKind| {
            sq.and_then(|s| self.piece_at(s))
                .is_some_and(|p| p.is(by, kind))
        };

        // An attacking pawn sits one rank behind the target from its own point of view.
        let back = -by.pawn_direction();
        if holds(square.offset(-1, back), PieceKind::Pawn)
            || holds(square.offset(1, back), PieceKind::Pawn)
        {
            return true;
        }

        if KNIGHT_OFFSETS
            .iter()
            .any(|&(df, dr)| holds(square.offset(df, dr), PieceKind::Knight))
        {
            return true;
        }

        if KING_OFFSETS
            .iter()
            .any(|&(df, dr)| holds(square.offset(df, dr), PieceKind::King))
        {
            return true;
        }

        self.slider_reaches(square, by, &ROOK_DIRECTIONS, PieceKind::Rook)
            || self.slider_reaches(square, by, &BISHOP_DIRECTIONS, PieceKind::Bishop)
    }

    /// Is `color`'s king attacked?
    ///
    /// # Panics
    /// Panics if `color` has no king on the board.
    #[must_use]
    pub fn is_king_in_check(&self, color: Color) -> bool {
        self.is_square_attacked(self.king_square(color), color.opponent())
    }

    fn slider_reaches(
        &self,
        square: Square,
        by: Color,
        directions: &[(i8, i8)],
        kind: PieceKind,
    ) -> bool {
        directions.iter().any(|&(df, dr)| {
            let mut current = square;
            while let Some(next) = current.offset(df, dr) {
                if let Some(piece) = self.piece_at(next) {
                    return piece.color() == by
                        && (piece.kind() == kind || piece.kind() == PieceKind::Queen);
                }
                current = next;
            }
            false
        })
    }
}
