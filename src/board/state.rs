use std::collections::BTreeMap;

use super::error::BoardError;
use super::{Color, Piece, PieceId, PieceKind, Square};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The Position Store: an 8x8 grid of pieces plus the identity index
/// `PieceId -> Square`.
///
/// The grid owns every [`Piece`]. The index is private and only ever
/// touched by the same calls that touch the grid, so the two cannot
/// disagree. No chess legality is checked here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    index: BTreeMap<PieceId, Square>,
    next_id: u16,
}

impl Board {
    /// The standard initial position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        for (file, kind) in (0u8..).zip(BACK_RANK) {
            for (color, pawn_rank) in [(Color::White, 1), (Color::Black, 6)] {
                let back = Square::new(file, color.back_rank()).expect("file < 8");
                let pawn = Square::new(file, pawn_rank).expect("file < 8");
                let piece = board.issue_piece(kind, color);
                board.raw_place(back, piece);
                let piece = board.issue_piece(PieceKind::Pawn, color);
                board.raw_place(pawn, piece);
            }
        }
        board
    }

    /// A board with no pieces.
    #[must_use]
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            index: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Put a piece on an empty square.
    pub fn place(&mut self, square: Square, piece: Piece) -> Result<(), BoardError> {
        if self.squares[square.index()].is_some() {
            return Err(BoardError::Occupied { square });
        }
        if let Some(&at) = self.index.get(&piece.id()) {
            return Err(BoardError::Occupied { square: at });
        }
        self.raw_place(square, piece);
        Ok(())
    }

    /// Create a fresh, unmoved piece and put it on an empty square.
    pub fn place_new(
        &mut self,
        square: Square,
        kind: PieceKind,
        color: Color,
    ) -> Result<PieceId, BoardError> {
        if self.squares[square.index()].is_some() {
            return Err(BoardError::Occupied { square });
        }
        let piece = self.issue_piece(kind, color);
        self.raw_place(square, piece);
        Ok(piece.id())
    }

    /// Take the piece off a square, returning it.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.raw_remove(square)
    }

    /// Move the piece on `from` to `to`, returning whatever stood on `to`.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Option<Piece>, BoardError> {
        if self.squares[from.index()].is_none() {
            return Err(BoardError::EmptySquare { square: from });
        }
        if from == to {
            return Err(BoardError::SameSquare { square: from });
        }
        let captured = self.raw_remove(to);
        self.raw_move(from, to);
        Ok(captured)
    }

    /// Where a piece currently stands.
    ///
    /// Fails with [`BoardError::NotFound`] once the piece has been captured,
    /// promoted away or removed.
    pub fn locate(&self, id: PieceId) -> Result<Square, BoardError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(BoardError::NotFound { id })
    }

    /// Flag the piece on `square` as having moved; returns the previous flag.
    pub fn set_moved(&mut self, square: Square) -> Result<bool, BoardError> {
        let piece = self.squares[square.index()]
            .as_mut()
            .ok_or(BoardError::EmptySquare { square })?;
        let previous = piece.has_moved();
        piece.set_moved(true);
        Ok(previous)
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.squares[square.index()].as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }

    /// Color of the piece on a square
    #[inline]
    #[must_use]
    pub fn color_on(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(Piece::color)
    }

    /// All pieces of one color with their squares, in identity order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.occupied().filter(move |(_, piece)| piece.color() == color)
    }

    /// Every piece on the board with its square, in identity order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, &Piece)> + '_ {
        self.index.values().map(move |&sq| {
            let piece = self.squares[sq.index()]
                .as_ref()
                .expect("position index points at an empty square");
            (sq, piece)
        })
    }

    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.index.len()
    }

    /// Square of `color`'s king.
    ///
    /// # Panics
    /// Panics if that king is missing: a board without both kings is corrupt.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color)
            .find(|(_, piece)| piece.kind() == PieceKind::King)
            .map(|(sq, _)| sq)
            .unwrap_or_else(|| panic!("{color} king is missing from the board"))
    }

    pub(crate) fn issue_piece(&mut self, kind: PieceKind, color: Color) -> Piece {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        Piece::new(id, kind, color)
    }

    pub(super) fn next_id(&self) -> u16 {
        self.next_id
    }

    pub(super) fn restore_next_id(&mut self, next_id: u16) {
        self.next_id = next_id;
    }

    pub(super) fn raw_place(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.squares[square.index()].is_none());
        self.index.insert(piece.id(), square);
        self.squares[square.index()] = Some(piece);
    }

    pub(super) fn raw_remove(&mut self, square: Square) -> Option<Piece> {
        let piece = self.squares[square.index()].take()?;
        self.index.remove(&piece.id());
        Some(piece)
    }

    pub(super) fn raw_move(&mut self, from: Square, to: Square) {
        let piece = self.squares[from.index()]
            .take()
            .expect("raw_move from an empty square");
        debug_assert!(self.squares[to.index()].is_none());
        self.index.insert(piece.id(), to);
        self.squares[to.index()] = Some(piece);
    }

    pub(super) fn raw_set_moved(&mut self, square: Square, moved: bool) {
        if let Some(piece) = self.squares[square.index()].as_mut() {
            piece.set_moved(moved);
        }
    }

    /// Check that grid and index describe the same position.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let on_grid = self.squares.iter().flatten().count();
        assert_eq!(on_grid, self.index.len(), "grid/index size mismatch");
        for (id, sq) in &self.index {
            let piece = self.squares[sq.index()].expect("index points at empty square");
            assert_eq!(piece.id(), *id, "index entry disagrees with grid on {sq}");
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial_position_layout() {
        let board = Board::new();
        assert_eq!(board.piece_count(), 32);
        assert!(board.piece_at(sq("e1")).unwrap().is(Color::White, PieceKind::King));
        assert!(board.piece_at(sq("d8")).unwrap().is(Color::Black, PieceKind::Queen));
        assert!(board.piece_at(sq("c7")).unwrap().is(Color::Black, PieceKind::Pawn));
        assert!(board.is_empty(sq("e4")));
        board.assert_consistent();
    }

    #[test]
    fn test_move_updates_grid_and_index() {
        let mut board = Board::new();
        let id = board.piece_at(sq("g1")).unwrap().id();
        let captured = board.move_piece(sq("g1"), sq("f3")).unwrap();
        assert!(captured.is_none());
        assert_eq!(board.locate(id), Ok(sq("f3")));
        assert!(board.is_empty(sq("g1")));
        board.assert_consistent();
    }

    #[test]
    fn test_capture_drops_victim_from_index() {
        let mut board = Board::new();
        let victim = board.piece_at(sq("d7")).unwrap().id();
        let captured = board.move_piece(sq("d1"), sq("d7")).unwrap();
        assert_eq!(captured.map(|p| p.id()), Some(victim));
        assert_eq!(board.locate(victim), Err(BoardError::NotFound { id: victim }));
        board.assert_consistent();
    }

    #[test]
    fn test_move_from_empty_square_fails() {
        let mut board = Board::new();
        assert_eq!(
            board.move_piece(sq("e4"), sq("e5")),
            Err(BoardError::EmptySquare { square: sq("e4") })
        );
    }

    #[test]
    fn test_move_onto_own_square_fails_without_change() {
        let mut board = Board::new();
        let before = board.clone();
        assert_eq!(
            board.move_piece(sq("e2"), sq("e2")),
            Err(BoardError::SameSquare { square: sq("e2") })
        );
        assert_eq!(board, before);
        board.assert_consistent();
    }

    #[test]
    fn test_place_rejects_occupied_square() {
        let mut board = Board::new();
        let piece = board.remove(sq("a2")).unwrap();
        assert_eq!(
            board.place(sq("a1"), piece),
            Err(BoardError::Occupied { square: sq("a1") })
        );
        assert!(board.place(sq("a3"), piece).is_ok());
        assert_eq!(board.locate(piece.id()), Ok(sq("a3")));
        board.assert_consistent();
    }

    #[test]
    fn test_set_moved_reports_previous_flag() {
        let mut board = Board::new();
        assert_eq!(board.set_moved(sq("h1")), Ok(false));
        assert_eq!(board.set_moved(sq("h1")), Ok(true));
        assert!(board.piece_at(sq("h1")).unwrap().has_moved());
        assert!(board.set_moved(sq("h4")).is_err());
    }

    #[test]
    fn test_king_square() {
        let board = Board::new();
        assert_eq!(board.king_square(Color::White), sq("e1"));
        assert_eq!(board.king_square(Color::Black), sq("e8"));
    }

    #[test]
    #[should_panic(expected = "king is missing")]
    fn test_missing_king_panics() {
        let mut board = Board::new();
        board.remove(sq("e8"));
        let _ = board.king_square(Color::Black);
    }
}
