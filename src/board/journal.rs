//! Reversible mutation of the Position Store.
//!
//! A [`Journal`] records every primitive change it makes to a [`Board`].
//! Dropping it without calling [`Journal::commit`] replays the journal
//! backwards, so a simulated move can never leak into the real position,
//! even on an early return.

use super::error::BoardError;
use super::state::Board;
use super::{Color, Piece, PieceKind, Square};

#[derive(Clone, Copy, Debug)]
enum Entry {
    Placed { square: Square },
    Removed { square: Square, piece: Piece },
    Moved { from: Square, to: Square },
    Flagged { square: Square, previous: bool },
    Issued { previous: u16 },
}

pub struct Journal<'a> {
    board: &'a mut Board,
    entries: Vec<Entry>,
    committed: bool,
}

impl<'a> Journal<'a> {
    pub fn begin(board: &'a mut Board) -> Self {
        Journal {
            board,
            entries: Vec::with_capacity(6),
            committed: false,
        }
    }

    /// Read access to the board as it currently stands inside the journal.
    #[inline]
    #[must_use]
    pub fn board(&self) -> &Board {
        self.board
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let piece = self.board.raw_remove(square)?;
        self.entries.push(Entry::Removed { square, piece });
        Some(piece)
    }

    /// Move a piece, capturing whatever stood on `to`.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Option<Piece>, BoardError> {
        if self.board.is_empty(from) {
            return Err(BoardError::EmptySquare { square: from });
        }
        if from == to {
            return Err(BoardError::SameSquare { square: from });
        }
        let captured = self.remove(to);
        self.board.raw_move(from, to);
        self.entries.push(Entry::Moved { from, to });
        Ok(captured)
    }

    /// Create a new piece on an empty square.
    pub fn spawn(
        &mut self,
        square: Square,
        kind: PieceKind,
        color: Color,
    ) -> Result<Piece, BoardError> {
        if !self.board.is_empty(square) {
            return Err(BoardError::Occupied { square });
        }
        let previous = self.board.next_id();
        let piece = self.board.issue_piece(kind, color);
        self.entries.push(Entry::Issued { previous });
        self.board.raw_place(square, piece);
        self.entries.push(Entry::Placed { square });
        Ok(piece)
    }

    pub fn set_moved(&mut self, square: Square) -> Result<(), BoardError> {
        let previous = self.board.set_moved(square)?;
        self.entries.push(Entry::Flagged { square, previous });
        Ok(())
    }

    /// Keep every change made so far.
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Undo every change made so far.
    pub fn rollback(self) {
        // Drop does the work.
    }

    fn undo(&mut self) {
        while let Some(entry) = self.entries.pop() {
            match entry {
                Entry::Placed { square } => {
                    self.board.raw_remove(square);
                }
                Entry::Removed { square, piece } => self.board.raw_place(square, piece),
                Entry::Moved { from, to } => self.board.raw_move(to, from),
                Entry::Flagged { square, previous } => self.board.raw_set_moved(square, previous),
                Entry::Issued { previous } => self.board.restore_next_id(previous),
            }
        }
    }
}

impl Drop for Journal<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.undo();
        }
    }
}
