//! Applying a move with all of its side effects.
//!
//! [`execute`] is the single place that knows how en passant, castling and
//! promotion change the board. Both the legality check (which rolls back)
//! and the game (which commits) go through it.

use super::error::BoardError;
use super::journal::Journal;
use super::{CastleSide, Move, Piece, PieceKind, Square};

/// What a move did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveEffects {
    /// The moving piece as it was before the move
    pub mover: Piece,
    pub captured: Option<Piece>,
    pub castle: Option<CastleSide>,
    pub en_passant: bool,
    /// The new piece that replaced a promoting pawn
    pub promoted: Option<Piece>,
}

pub(crate) fn execute(
    journal: &mut Journal<'_>,
    mv: Move,
    last_move: Option<Move>,
) -> Result<MoveEffects, BoardError> {
    let mover = *journal
        .board()
        .piece_at(mv.from)
        .ok_or(BoardError::EmptySquare { square: mv.from })?;
    let color = mover.color();
    let mut captured = None;
    let mut castle = None;
    let mut en_passant = false;

    match mover.kind() {
        PieceKind::Pawn => {
            let ep = journal.board().en_passant_for(color, last_move);
            if let Some(ep) = ep.filter(|ep| ep.target == mv.to && mv.from.file() != mv.to.file()) {
                if journal.board().is_empty(mv.to) {
                    captured = journal.remove(ep.victim);
                    en_passant = captured.is_some();
                }
            }
        }
        PieceKind::King if mv.from.file().abs_diff(mv.to.file()) == 2 => {
            if let Some(side) = CastleSide::from_king_move(mv.from, mv.to) {
                let rank = mv.from.rank();
                let rook_from = square(side.rook_file(), rank);
                let rook_to = square(side.rook_target_file(), rank);
                journal.move_piece(rook_from, rook_to)?;
                journal.set_moved(rook_to)?;
                castle = Some(side);
            }
        }
        _ => {}
    }

    if let Some(taken) = journal.move_piece(mv.from, mv.to)? {
        captured = Some(taken);
    }
    journal.set_moved(mv.to)?;

    let mut promoted = None;
    if mover.kind() == PieceKind::Pawn && mv.to.rank() == color.pawn_promotion_rank() {
        let kind = mv.promotion.unwrap_or(PieceKind::Queen);
        journal.remove(mv.to);
        journal.spawn(mv.to, kind, color)?;
        journal.set_moved(mv.to)?;
        promoted = journal.board().piece_at(mv.to).copied();
    }

    Ok(MoveEffects {
        mover,
        captured,
        castle,
        en_passant,
        promoted,
    })
}

fn square(file: u8, rank: u8) -> Square {
    Square::new(file, rank).expect("castling squares are on the board")
}
