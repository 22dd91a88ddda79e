use log::{debug, info};

use super::config::RulesConfig;
use super::error::MoveRejection;
use super::history::PositionHistory;
use super::material::is_insufficient_material;
use super::outcome::{DrawReason, GameEvent, GameResult, GameStatus, MoveReport};
use crate::board::{execute, Board, Color, Journal, Move, PieceKind, Square};
use crate::zobrist::Fingerprint;

/// Identifies one exact moment of a game: how many plies have been played
/// and what the board looks like. Used to detect stale engine replies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionToken {
    pub ply: u32,
    pub fingerprint: Fingerprint,
}

/// The Game State Machine.
///
/// Single writer: the only mutators are [`Game::apply_move`] (and
/// [`Game::play`], which forwards to it) and [`Game::new_game`].
#[derive(Clone, Debug)]
pub struct Game {
    pub(super) board: Board,
    pub(super) side_to_move: Color,
    pub(super) last_move: Option<Move>,
    pub(super) halfmove_clock: u32,
    pub(super) plies_before_start: u32,
    pub(super) history: PositionHistory,
    pub(super) status: GameStatus,
    pub(super) rules: RulesConfig,
}

impl Game {
    /// A game at the standard initial position with default rules.
    #[must_use]
    pub fn new() -> Self {
        Game::with_rules(RulesConfig::default())
    }

    #[must_use]
    pub fn with_rules(rules: RulesConfig) -> Self {
        let board = Board::new();
        let history = PositionHistory::starting_at(Fingerprint::of(&board, Color::White));
        Game {
            board,
            side_to_move: Color::White,
            last_move: None,
            halfmove_clock: 0,
            plies_before_start: 0,
            history,
            status: GameStatus::AwaitingMove(Color::White),
            rules,
        }
    }

    /// Reset to the initial position, keeping the rules configuration.
    pub fn new_game(&mut self) {
        *self = Game::with_rules(self.rules);
        info!("new game started");
    }

    /// Apply a move requested as coordinates.
    ///
    /// A promotion choice of `None` on a promoting move means a queen.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<MoveReport, MoveRejection> {
        let mv = self.validate(from, to, promotion)?;
        let mover = self.side_to_move;

        let effects = {
            let mut journal = Journal::begin(&mut self.board);
            let effects = execute(&mut journal, mv, self.last_move)
                .expect("validated move failed to execute");
            journal.commit();
            effects
        };

        if effects.captured.is_some() || effects.mover.kind() == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.last_move = Some(mv);
        self.side_to_move = mover.opponent();
        self.history
            .push(Fingerprint::of(&self.board, self.side_to_move));

        let check = self.board.is_king_in_check(self.side_to_move);
        let result = self.evaluate_terminal();

        let mut events = Vec::with_capacity(2);
        match result {
            Some(result) => {
                self.status = GameStatus::Ended(result);
                if check {
                    events.push(GameEvent::CheckAsserted(self.side_to_move));
                }
                events.push(GameEvent::GameEnded(result));
                info!("game over after {mv}: {result}");
            }
            None => {
                self.status = GameStatus::AwaitingMove(self.side_to_move);
                events.push(GameEvent::SideToMoveChanged(self.side_to_move));
                if check {
                    events.push(GameEvent::CheckAsserted(self.side_to_move));
                }
            }
        }
        debug!("{mover} played {mv}, halfmove clock {}", self.halfmove_clock);

        Ok(MoveReport {
            played: mv,
            mover,
            piece: effects.mover.kind(),
            captured: effects.captured.map(|p| p.kind()),
            check,
            castle: effects.castle,
            promotion: effects.promoted.map(|p| p.kind()),
            en_passant: effects.en_passant,
            events,
        })
    }

    /// Apply a [`Move`] value, e.g. one parsed from UCI text.
    pub fn play(&mut self, mv: Move) -> Result<MoveReport, MoveRejection> {
        self.apply_move(mv.from, mv.to, mv.promotion)
    }

    /// Check a request against the rules without changing anything and
    /// return the move to execute.
    fn validate(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveRejection> {
        if self.is_ended() {
            return Err(MoveRejection::GameOver);
        }
        let piece = self
            .board
            .piece_at(from)
            .ok_or(MoveRejection::NoPieceAt { square: from })?;
        if piece.color() != self.side_to_move {
            return Err(MoveRejection::WrongColor {
                square: from,
                color: piece.color(),
            });
        }

        let generated = self
            .board
            .pseudo_legal_moves_from(from, self.last_move)
            .into_iter()
            .find(|m| m.to == to)
            .ok_or(MoveRejection::NotAPieceMove { from, to })?;

        let mv = match (generated.promotion, promotion) {
            (Some(default), None) => generated.with_promotion(Some(default)),
            (Some(_), Some(kind)) if kind.is_promotion_target() => {
                generated.with_promotion(Some(kind))
            }
            (Some(_), Some(kind)) => return Err(MoveRejection::InvalidPromotion { kind }),
            (None, Some(_)) => return Err(MoveRejection::UnexpectedPromotion),
            (None, None) => generated,
        };

        if !self.board.is_move_legal(mv, self.side_to_move, self.last_move) {
            return Err(MoveRejection::LeavesKingInCheck);
        }
        Ok(mv)
    }

    /// Terminal conditions for the side to move, in priority order.
    pub(super) fn evaluate_terminal(&mut self) -> Option<GameResult> {
        let side = self.side_to_move;
        if !self.board.has_legal_move(side, self.last_move) {
            return Some(if self.board.is_king_in_check(side) {
                GameResult::Checkmate {
                    winner: side.opponent(),
                }
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            });
        }
        if is_insufficient_material(&self.board) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        if self.history.count(self.history.current()) >= 3 {
            return Some(GameResult::Draw(DrawReason::Repetition));
        }
        if self.halfmove_clock >= self.rules.fifty_move_threshold {
            return Some(GameResult::Draw(DrawReason::MoveLimit));
        }
        None
    }

    /// Legal moves for the side to move; empty once the game has ended.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        if self.is_ended() {
            return Vec::new();
        }
        self.board.legal_moves(self.side_to_move, self.last_move)
    }

    /// Legal destinations for the piece on `from`, if it belongs to the side to move.
    pub fn legal_moves_from(&mut self, from: Square) -> Vec<Move> {
        if self.is_ended() || self.board.color_on(from) != Some(self.side_to_move) {
            return Vec::new();
        }
        self.board.legal_moves_from(from, self.last_move)
    }

    /// Is the side to move in check?
    #[must_use]
    pub fn is_in_check(&self) -> bool {
        self.board.is_king_in_check(self.side_to_move)
    }

    #[inline]
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Starts at 1 and increments after each Black move.
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        let positions = u32::try_from(self.history.len()).unwrap_or(u32::MAX);
        self.plies_before_start.saturating_add(positions).saturating_add(1) / 2
    }

    /// Half-moves played since the game's starting position, plus any the
    /// starting position implies.
    #[must_use]
    pub fn ply(&self) -> u32 {
        let played = u32::try_from(self.history.len() - 1).unwrap_or(u32::MAX);
        self.plies_before_start.saturating_add(played)
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameResult> {
        match self.status {
            GameStatus::Ended(result) => Some(result),
            GameStatus::AwaitingMove(_) => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_ended(&self) -> bool {
        matches!(self.status, GameStatus::Ended(_))
    }

    /// Fingerprints of every position so far, including the start.
    #[must_use]
    pub fn history(&self) -> &[Fingerprint] {
        self.history.as_slice()
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.history.current()
    }

    #[must_use]
    pub fn position_token(&self) -> PositionToken {
        PositionToken {
            ply: self.ply(),
            fingerprint: self.fingerprint(),
        }
    }

    #[inline]
    #[must_use]
    pub fn rules(&self) -> RulesConfig {
        self.rules
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
