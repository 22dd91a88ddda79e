use super::super::{Board, Color, Move, Square};

impl Board {
    /// Walk each direction until the edge, stopping before an own piece and
    /// on an enemy piece.
    pub(crate) fn generate_slider_moves(
        &self,
        from: Square,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(df, dr) in directions {
            let mut current = from;
            while let Some(to) = current.offset(df, dr) {
                if !self.push_if_reachable(from, to, color, moves) {
                    break;
                }
                current = to;
            }
        }
    }
}
