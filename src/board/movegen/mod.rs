//! Pseudo-legal move generation.
//!
//! Moves produced here obey each piece's movement rules but may leave the
//! mover's own king in check; [`Board::legal_moves`] filters those out.
//! Castling is the exception: its attacked-square conditions are checked
//! during generation.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::{Board, Color, Move, PieceKind, Square};

pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// An en passant capture made available by the previous move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct EnPassant {
    /// Square the capturing pawn lands on (behind the passed pawn)
    pub target: Square,
    /// Square of the pawn that just advanced two ranks
    pub victim: Square,
}

impl Board {
    /// Pseudo-legal moves for every piece of `color`.
    #[must_use]
    pub fn pseudo_legal_moves(&self, color: Color, last_move: Option<Move>) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for (from, piece) in self.pieces(color) {
            self.generate_piece_moves(from, piece.kind(), color, last_move, &mut moves);
        }
        moves
    }

    /// Pseudo-legal moves for the piece on `from`; empty when the square is empty.
    #[must_use]
    pub fn pseudo_legal_moves_from(&self, from: Square, last_move: Option<Move>) -> Vec<Move> {
        let mut moves = Vec::new();
        if let Some(piece) = self.piece_at(from) {
            self.generate_piece_moves(from, piece.kind(), piece.color(), last_move, &mut moves);
        }
        moves
    }

    fn generate_piece_moves(
        &self,
        from: Square,
        kind: PieceKind,
        color: Color,
        last_move: Option<Move>,
        moves: &mut Vec<Move>,
    ) {
        match kind {
            PieceKind::Pawn => self.generate_pawn_moves(from, color, last_move, moves),
            PieceKind::Knight => self.generate_knight_moves(from, color, moves),
            PieceKind::Bishop => self.generate_slider_moves(from, color, &BISHOP_DIRECTIONS, moves),
            PieceKind::Rook => self.generate_slider_moves(from, color, &ROOK_DIRECTIONS, moves),
            PieceKind::Queen => {
                self.generate_slider_moves(from, color, &ROOK_DIRECTIONS, moves);
                self.generate_slider_moves(from, color, &BISHOP_DIRECTIONS, moves);
            }
            PieceKind::King => self.generate_king_moves(from, color, moves),
        }
    }

    /// The en passant capture open to `color`, if the previous move was an
    /// enemy pawn's double step.
    pub(crate) fn en_passant_for(&self, color: Color, last_move: Option<Move>) -> Option<EnPassant> {
        let last = last_move?;
        let enemy = color.opponent();
        let advanced = self.piece_at(last.to)?;
        if !advanced.is(enemy, PieceKind::Pawn)
            || !last.is_double_step()
            || last.from.rank() != enemy.pawn_start_rank()
        {
            return None;
        }
        let target = last.from.offset(0, enemy.pawn_direction())?;
        Some(EnPassant {
            target,
            victim: last.to,
        })
    }

    /// Whether some pawn of `color` could actually capture en passant right now.
    pub(crate) fn en_passant_capturable(&self, color: Color, last_move: Option<Move>) -> Option<Square> {
        let ep = self.en_passant_for(color, last_move)?;
        [-1, 1]
            .into_iter()
            .filter_map(|df| ep.victim.offset(df, 0))
            .any(|sq| self.piece_at(sq).is_some_and(|p| p.is(color, PieceKind::Pawn)))
            .then_some(ep.target)
    }

    /// Push a move to `to` unless it is off-limits because an own piece stands there.
    /// Returns true when the square was empty (sliders keep walking).
    #[inline]
    fn push_if_reachable(&self, from: Square, to: Square, color: Color, moves: &mut Vec<Move>) -> bool {
        match self.color_on(to) {
            None => {
                moves.push(Move::new(from, to));
                true
            }
            Some(c) if c != color => {
                moves.push(Move::new(from, to));
                false
            }
            Some(_) => false,
        }
    }
}
