//! A game plus an optional engine opponent.
//!
//! The session is the only writer of its [`Game`]. Human moves go straight
//! to [`Game::apply_move`]; engine moves come back from the worker thread
//! as replies and are submitted through the same call, but only when the
//! game is still at the exact position the search was requested for.

use std::time::Duration;

use log::{debug, error, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::{Color, Move, PieceKind, Square};
use crate::engine::{
    EngineConfig, EngineError, EngineState, EngineWorker, SearchReply, SearchRequest,
    SearchTicket,
};
use crate::game::{Game, MoveRejection, MoveReport, RulesConfig};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SessionConfig {
    /// The side the engine plays; `None` for two humans
    pub engine_side: Option<Color>,
    pub rules: RulesConfig,
    pub engine: EngineConfig,
}

/// What became of an engine reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineTurn {
    /// The engine's move was accepted
    Played(MoveReport),
    /// The engine produced no move; the turn passes to the caller
    NoMove(EngineError),
    /// The engine's move broke the rules and was not played
    Rejected { mv: Move, rejection: MoveRejection },
    /// The reply was for a position the game has since left
    Stale,
}

pub struct Session {
    game: Game,
    engine_side: Option<Color>,
    worker: Option<EngineWorker>,
    generation: u64,
    pending: Option<SearchTicket>,
}

impl Session {
    /// Create a session. The engine worker is started only when the engine
    /// plays a side; the engine process itself starts on the first search.
    pub fn new(config: SessionConfig) -> Result<Self, EngineError> {
        let worker = match config.engine_side {
            Some(_) => Some(EngineWorker::spawn(config.engine)?),
            None => None,
        };
        Ok(Session {
            game: Game::with_rules(config.rules),
            engine_side: config.engine_side,
            worker,
            generation: 0,
            pending: None,
        })
    }

    #[inline]
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn engine_side(&self) -> Option<Color> {
        self.engine_side
    }

    #[must_use]
    pub fn engine_status(&self) -> Option<EngineState> {
        self.worker.as_ref().map(EngineWorker::status)
    }

    /// Whether an engine search is outstanding for the current position.
    #[must_use]
    pub fn is_engine_thinking(&self) -> bool {
        self.pending == Some(self.ticket())
    }

    /// Submit a move from the human side. Either color may be moved; moving
    /// for the engine's side makes any pending engine reply stale.
    pub fn submit(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<MoveReport, MoveRejection> {
        self.game.apply_move(from, to, promotion)
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        self.game.legal_moves()
    }

    /// Legal moves of the piece on `from`, for highlighting.
    pub fn legal_moves_from(&mut self, from: Square) -> Vec<Move> {
        self.game.legal_moves_from(from)
    }

    /// Ask the engine for a move when it is the engine's turn and no search
    /// for this exact position is already running. Returns whether a
    /// request was sent.
    pub fn request_engine_move_if_due(&mut self) -> bool {
        if self.game.is_ended() || self.engine_side != Some(self.game.side_to_move()) {
            return false;
        }
        let ticket = self.ticket();
        if self.pending == Some(ticket) {
            return false;
        }
        let Some(worker) = self.worker.as_ref() else {
            return false;
        };
        let request = SearchRequest {
            ticket,
            fen: self.game.to_fen(),
        };
        match worker.request(request) {
            Ok(()) => {
                debug!("requested engine move at ply {}", ticket.position.ply);
                self.pending = Some(ticket);
                true
            }
            Err(err) => {
                error!("could not reach engine worker: {err}");
                false
            }
        }
    }

    /// Apply a finished engine reply, if one is waiting.
    pub fn poll_engine(&mut self) -> Option<EngineTurn> {
        let reply = self.worker.as_ref()?.try_reply()?;
        Some(self.handle_reply(reply))
    }

    /// Block up to `timeout` for an engine reply and apply it.
    pub fn wait_engine(&mut self, timeout: Duration) -> Option<EngineTurn> {
        let reply = self.worker.as_ref()?.wait_reply(timeout)?;
        Some(self.handle_reply(reply))
    }

    /// Start over from the initial position. Replies to searches from the
    /// previous game are discarded when they arrive.
    pub fn new_game(&mut self) {
        self.game.new_game();
        self.generation += 1;
        self.pending = None;
    }

    fn ticket(&self) -> SearchTicket {
        SearchTicket {
            generation: self.generation,
            position: self.game.position_token(),
        }
    }

    fn handle_reply(&mut self, reply: SearchReply) -> EngineTurn {
        if self.pending == Some(reply.ticket) {
            self.pending = None;
        }
        if self.game.is_ended() || reply.ticket != self.ticket() {
            warn!(
                "discarding stale engine reply for ply {}",
                reply.ticket.position.ply
            );
            return EngineTurn::Stale;
        }
        match reply.result {
            Ok(found) => match self.game.play(found.mv) {
                Ok(report) => {
                    info!("engine played {}", report.played);
                    EngineTurn::Played(report)
                }
                Err(rejection) => {
                    warn!("engine move {} rejected: {rejection}", found.mv);
                    EngineTurn::Rejected {
                        mv: found.mv,
                        rejection,
                    }
                }
            },
            Err(err) => EngineTurn::NoMove(err),
        }
    }
}
