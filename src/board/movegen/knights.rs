use super::super::{Board, Color, Move, Square};
use super::KNIGHT_OFFSETS;

impl Board {
    pub(crate) fn generate_knight_moves(&self, from: Square, color: Color, moves: &mut Vec<Move>) {
        for (df, dr) in KNIGHT_OFFSETS {
            if let Some(to) = from.offset(df, dr) {
                self.push_if_reachable(from, to, color, moves);
            }
        }
    }
}
