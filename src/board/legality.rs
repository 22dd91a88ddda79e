//! Legality filtering and mate/stalemate detection.

use super::execute::execute;
use super::journal::Journal;
use super::{Board, Color, Move, Square};

impl Board {
    /// Apply `mv` in a journal, test whether `color`'s king is attacked,
    /// and roll back. The board is left exactly as it was.
    pub fn is_move_legal(&mut self, mv: Move, color: Color, last_move: Option<Move>) -> bool {
        let mut journal = Journal::begin(self);
        if execute(&mut journal, mv, last_move).is_err() {
            return false;
        }
        let in_check = journal.board().is_king_in_check(color);
        journal.rollback();
        !in_check
    }

    /// All legal moves for `color`.
    pub fn legal_moves(&mut self, color: Color, last_move: Option<Move>) -> Vec<Move> {
        let mut moves = self.pseudo_legal_moves(color, last_move);
        moves.retain(|&mv| self.is_move_legal(mv, color, last_move));
        moves
    }

    /// Legal moves of the piece on `from`.
    pub fn legal_moves_from(&mut self, from: Square, last_move: Option<Move>) -> Vec<Move> {
        let Some(color) = self.color_on(from) else {
            return Vec::new();
        };
        let mut moves = self.pseudo_legal_moves_from(from, last_move);
        moves.retain(|&mv| self.is_move_legal(mv, color, last_move));
        moves
    }

    /// Whether `color` has at least one legal move; stops at the first.
    pub fn has_legal_move(&mut self, color: Color, last_move: Option<Move>) -> bool {
        self.pseudo_legal_moves(color, last_move)
            .into_iter()
            .any(|mv| self.is_move_legal(mv, color, last_move))
    }

    pub fn is_checkmate(&mut self, color: Color, last_move: Option<Move>) -> bool {
        self.is_king_in_check(color) && !self.has_legal_move(color, last_move)
    }

    /// Not in check and no legal move.
    pub fn is_stalemate_or_dead(&mut self, color: Color, last_move: Option<Move>) -> bool {
        !self.is_king_in_check(color) && !self.has_legal_move(color, last_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_start_position_has_twenty_legal_moves() {
        let mut board = Board::new();
        assert_eq!(board.legal_moves(Color::White, None).len(), 20);
    }

    #[test]
    fn test_pinned_piece_cannot_leave_the_line() {
        let mut board = Board::empty();
        board.place_new(sq("e1"), PieceKind::King, Color::White).unwrap();
        board.place_new(sq("e2"), PieceKind::Knight, Color::White).unwrap();
        board.place_new(sq("e8"), PieceKind::Rook, Color::Black).unwrap();
        board.place_new(sq("a8"), PieceKind::King, Color::Black).unwrap();
        assert!(board.legal_moves_from(sq("e2"), None).is_empty());
        assert!(!board.legal_moves_from(sq("e1"), None).is_empty());
    }

    #[test]
    fn test_legality_check_leaves_board_untouched() {
        let mut board = Board::new();
        let before = board.clone();
        let _ = board.legal_moves(Color::White, None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_back_rank_mate() {
        let mut board = Board::empty();
        board.place_new(sq("g1"), PieceKind::King, Color::White).unwrap();
        board.place_new(sq("f2"), PieceKind::Pawn, Color::White).unwrap();
        board.place_new(sq("g2"), PieceKind::Pawn, Color::White).unwrap();
        board.place_new(sq("h2"), PieceKind::Pawn, Color::White).unwrap();
        board.place_new(sq("a1"), PieceKind::Rook, Color::Black).unwrap();
        board.place_new(sq("a8"), PieceKind::King, Color::Black).unwrap();
        assert!(board.is_checkmate(Color::White, None));
        assert!(!board.is_stalemate_or_dead(Color::White, None));
    }

    #[test]
    fn test_cornered_king_stalemate() {
        let mut board = Board::empty();
        board.place_new(sq("h8"), PieceKind::King, Color::Black).unwrap();
        board.place_new(sq("g6"), PieceKind::Queen, Color::White).unwrap();
        board.place_new(sq("a1"), PieceKind::King, Color::White).unwrap();
        assert!(board.is_stalemate_or_dead(Color::Black, None));
        assert!(!board.is_checkmate(Color::Black, None));
    }

    #[test]
    fn test_king_cannot_capture_defended_piece() {
        let mut board = Board::empty();
        board.place_new(sq("e1"), PieceKind::King, Color::White).unwrap();
        board.place_new(sq("e2"), PieceKind::Queen, Color::Black).unwrap();
        board.place_new(sq("d3"), PieceKind::Pawn, Color::Black).unwrap();
        board.place_new(sq("h8"), PieceKind::King, Color::Black).unwrap();
        let moves = board.legal_moves_from(sq("e1"), None);
        assert!(!moves.contains(&Move::new(sq("e1"), sq("e2"))));
        assert!(board.is_checkmate(Color::White, None));
    }
}
