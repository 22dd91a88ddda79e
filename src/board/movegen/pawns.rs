use super::super::{Board, Color, Move, PieceKind, Square};

impl Board {
    pub(crate) fn generate_pawn_moves(
        &self,
        from: Square,
        color: Color,
        last_move: Option<Move>,
        moves: &mut Vec<Move>,
    ) {
        let dir = color.pawn_direction();

        if let Some(one) = from.offset(0, dir).filter(|&sq| self.is_empty(sq)) {
            push_pawn_move(from, one, color, moves);
            if from.rank() == color.pawn_start_rank() {
                if let Some(two) = from.offset(0, 2 * dir).filter(|&sq| self.is_empty(sq)) {
                    moves.push(Move::new(from, two));
                }
            }
        }

        for df in [-1, 1] {
            let Some(to) = from.offset(df, dir) else {
                continue;
            };
            if self.color_on(to) == Some(color.opponent()) {
                push_pawn_move(from, to, color, moves);
            }
        }

        if let Some(ep) = self.en_passant_for(color, last_move) {
            if ep.victim.rank() == from.rank() && ep.victim.file().abs_diff(from.file()) == 1 {
                moves.push(Move::new(from, ep.target));
            }
        }
    }
}

/// Moves onto the last rank default to a queen promotion.
fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    let promotion = (to.rank() == color.pawn_promotion_rank()).then_some(PieceKind::Queen);
    moves.push(Move::new(from, to).with_promotion(promotion));
}
