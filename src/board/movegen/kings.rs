use super::super::{Board, CastleSide, Color, Move, PieceKind, Square};
use super::KING_OFFSETS;

impl Board {
    pub(crate) fn generate_king_moves(&self, from: Square, color: Color, moves: &mut Vec<Move>) {
        for (df, dr) in KING_OFFSETS {
            if let Some(to) = from.offset(df, dr) {
                self.push_if_reachable(from, to, color, moves);
            }
        }
        for side in CastleSide::BOTH {
            if self.can_castle(from, color, side) {
                let to = Square::new(side.king_target_file(), from.rank()).expect("castling file");
                moves.push(Move::new(from, to));
            }
        }
    }

    /// King and rook unmoved on their home squares, the path between them
    /// empty, and the king's start, transit and landing squares not attacked.
    fn can_castle(&self, from: Square, color: Color, side: CastleSide) -> bool {
        let rank = color.back_rank();
        if from.rank() != rank || from.file() != 4 {
            return false;
        }
        let king_ready = self
            .piece_at(from)
            .is_some_and(|k| k.is(color, PieceKind::King) && !k.has_moved());
        let rook_ready = Square::new(side.rook_file(), rank)
            .and_then(|sq| self.piece_at(sq))
            .is_some_and(|r| r.is(color, PieceKind::Rook) && !r.has_moved());
        if !king_ready || !rook_ready {
            return false;
        }

        let (low, high) = if side.rook_file() < 4 {
            (side.rook_file() + 1, 4)
        } else {
            (5, side.rook_file())
        };
        let path_clear = (low..high)
            .filter_map(|file| Square::new(file, rank))
            .all(|sq| self.is_empty(sq));
        if !path_clear {
            return false;
        }

        let enemy = color.opponent();
        [4, side.rook_target_file(), side.king_target_file()]
            .into_iter()
            .filter_map(|file| Square::new(file, rank))
            .all(|sq| !self.is_square_attacked(sq, enemy))
    }
}
