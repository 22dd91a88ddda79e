//! FEN encoding and decoding.

use log::debug;

use super::config::RulesConfig;
use super::history::PositionHistory;
use super::outcome::GameStatus;
use super::state::Game;
use crate::board::{Board, CastleSide, Color, FenError, Move, PieceKind, Square};
use crate::zobrist::Fingerprint;

/// FEN of the standard initial position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Leaves room for the plies a game can still add before the ply and
/// fullmove counters would overflow.
const MAX_PLIES_BEFORE_START: u32 = u32::MAX / 2;

/// Encode a game as FEN.
#[must_use]
pub fn to_fen(game: &Game) -> String {
    game.to_fen()
}

/// Decode a FEN string into a game with default rules.
pub fn parse_fen(fen: &str) -> Result<Game, FenError> {
    Game::from_fen(fen, RulesConfig::default())
}

impl Game {
    /// Convert the game position to FEN notation.
    ///
    /// Castling availability is recomputed from the king and rook `moved`
    /// flags. The en passant field names a square only when a capture there
    /// is actually available.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let board = &self.board;
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8 {
                let sq = square(file, rank);
                if let Some(piece) = board.piece_at(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.side_to_move == Color::White {
            "w"
        } else {
            "b"
        };

        let mut castling = String::new();
        for color in Color::BOTH {
            for side in CastleSide::BOTH {
                if castling_available(board, color, side) {
                    castling.push(castling_char(color, side));
                }
            }
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = board
            .en_passant_capturable(self.side_to_move, self.last_move)
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            active,
            castling,
            ep,
            self.halfmove_clock,
            self.fullmove_number()
        )
    }

    /// Set up a game from FEN notation.
    ///
    /// The halfmove clock and fullmove number are optional and default to
    /// `0` and `1`. `moved` flags are inferred: a king or rook on its home
    /// square counts as unmoved only if a matching castling right is listed,
    /// and a pawn off its starting rank counts as moved. The position is
    /// checked for terminal conditions straight away.
    pub fn from_fen(fen: &str, rules: RulesConfig) -> Result<Game, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut board = parse_placement(parts[0])?;
        for color in Color::BOTH {
            let found = board
                .pieces(color)
                .filter(|(_, p)| p.kind() == PieceKind::King)
                .count();
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let rights = parse_castling(parts[2])?;
        infer_moved_flags(&mut board, &rights);

        let last_move = parse_en_passant(parts[3], &board, side_to_move)?;

        let halfmove_clock = match parts.get(4) {
            Some(s) => parse_counter(s)?,
            None => 0,
        };
        let fullmove = match parts.get(5) {
            Some(s) => parse_counter(s)?.max(1),
            None => 1,
        };
        let plies_before_start = (fullmove - 1)
            .checked_mul(2)
            .and_then(|plies| plies.checked_add(u32::from(side_to_move == Color::Black)))
            .filter(|&plies| plies <= MAX_PLIES_BEFORE_START)
            .ok_or_else(|| FenError::InvalidCounter {
                found: fullmove.to_string(),
            })?;

        let history = PositionHistory::starting_at(Fingerprint::of(&board, side_to_move));
        let mut game = Game {
            board,
            side_to_move,
            last_move,
            halfmove_clock,
            plies_before_start,
            history,
            status: GameStatus::AwaitingMove(side_to_move),
            rules,
        };
        if let Some(result) = game.evaluate_terminal() {
            debug!("position loaded from FEN is already over: {result}");
            game.status = GameStatus::Ended(result);
        }
        Ok(game)
    }
}

fn square(file: u8, rank: u8) -> Square {
    Square::new(file, rank).expect("coordinates below 8")
}

fn castling_char(color: Color, side: CastleSide) -> char {
    let c = match side {
        CastleSide::KingSide => 'k',
        CastleSide::QueenSide => 'q',
    };
    if color == Color::White {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

fn castling_available(board: &Board, color: Color, side: CastleSide) -> bool {
    let rank = color.back_rank();
    let unmoved = |file: u8, kind: PieceKind| {
        board
            .piece_at(square(file, rank))
            .is_some_and(|p| p.is(color, kind) && !p.has_moved())
    };
    unmoved(4, PieceKind::King) && unmoved(side.rook_file(), PieceKind::Rook)
}

fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let mut board = Board::empty();
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidRank { rank: ranks.len() });
    }
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx as u8;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(run) = c.to_digit(10) {
                file += run as usize;
                continue;
            }
            let kind = PieceKind::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            if file >= 8 {
                return Err(FenError::BadFileCount {
                    rank: rank_idx,
                    files: file + 1,
                });
            }
            board
                .place_new(square(file as u8, rank), kind, color)
                .expect("each FEN square is filled once");
            file += 1;
        }
        if file != 8 {
            return Err(FenError::BadFileCount {
                rank: rank_idx,
                files: file,
            });
        }
    }
    Ok(board)
}

fn parse_castling(field: &str) -> Result<Vec<(Color, CastleSide)>, FenError> {
    if field == "-" {
        return Ok(Vec::new());
    }
    field
        .chars()
        .map(|c| match c {
            'K' => Ok((Color::White, CastleSide::KingSide)),
            'Q' => Ok((Color::White, CastleSide::QueenSide)),
            'k' => Ok((Color::Black, CastleSide::KingSide)),
            'q' => Ok((Color::Black, CastleSide::QueenSide)),
            _ => Err(FenError::InvalidCastling { char: c }),
        })
        .collect()
}

fn infer_moved_flags(board: &mut Board, rights: &[(Color, CastleSide)]) {
    let mut moved = Vec::new();
    for (sq, piece) in board.occupied() {
        let color = piece.color();
        let home = sq.rank() == color.back_rank();
        let is_moved = match piece.kind() {
            PieceKind::Pawn => sq.rank() != color.pawn_start_rank(),
            PieceKind::King => !(home && sq.file() == 4 && rights.iter().any(|&(c, _)| c == color)),
            PieceKind::Rook => !(home
                && rights
                    .iter()
                    .any(|&(c, side)| c == color && side.rook_file() == sq.file())),
            _ => false,
        };
        if is_moved {
            moved.push(sq);
        }
    }
    for sq in moved {
        board
            .set_moved(sq)
            .expect("square was just read from the occupied list");
    }
}

/// Turn the en passant field into the double step that must have produced it.
fn parse_en_passant(
    field: &str,
    board: &Board,
    side_to_move: Color,
) -> Result<Option<Move>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant {
        found: field.to_string(),
    };
    let target: Square = field.parse().map_err(|_| invalid())?;
    let enemy = side_to_move.opponent();
    let from = target.offset(0, -enemy.pawn_direction()).ok_or_else(invalid)?;
    let to = target.offset(0, enemy.pawn_direction()).ok_or_else(invalid)?;
    let pawn_in_place = board
        .piece_at(to)
        .is_some_and(|p| p.is(enemy, PieceKind::Pawn));
    if from.rank() != enemy.pawn_start_rank() || !pawn_in_place || !board.is_empty(target) {
        return Err(invalid());
    }
    Ok(Some(Move::new(from, to)))
}

fn parse_counter(field: &str) -> Result<u32, FenError> {
    field.parse().map_err(|_| FenError::InvalidCounter {
        found: field.to_string(),
    })
}
