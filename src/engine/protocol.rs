//! UCI lines exchanged with the external engine.

use std::fmt;

use super::error::EngineError;
use crate::board::Move;

/// Lines we send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand<'a> {
    Uci,
    IsReady,
    UciNewGame,
    Position { fen: &'a str },
    Go { depth: u32 },
    Quit,
}

impl fmt::Display for EngineCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCommand::Uci => f.write_str("uci"),
            EngineCommand::IsReady => f.write_str("isready"),
            EngineCommand::UciNewGame => f.write_str("ucinewgame"),
            EngineCommand::Position { fen } => write!(f, "position fen {fen}"),
            EngineCommand::Go { depth } => write!(f, "go depth {depth}"),
            EngineCommand::Quit => f.write_str("quit"),
        }
    }
}

/// A move chosen by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMove {
    pub mv: Move,
    /// The reply the engine expects, if it said so
    pub ponder: Option<Move>,
}

/// Lines we understand. Everything else (`id`, `option`, `info`, ...) is `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    UciOk,
    ReadyOk,
    BestMove(Result<EngineMove, EngineError>),
    Other,
}

pub fn parse_reply(line: &str) -> EngineReply {
    let trimmed = line.trim();
    match trimmed.split_whitespace().next() {
        Some("uciok") => EngineReply::UciOk,
        Some("readyok") => EngineReply::ReadyOk,
        Some("bestmove") => EngineReply::BestMove(parse_bestmove(trimmed)),
        _ => EngineReply::Other,
    }
}

/// Parse `bestmove <move> [ponder <move>]`.
pub fn parse_bestmove(line: &str) -> Result<EngineMove, EngineError> {
    let malformed = || EngineError::MalformedReply {
        line: line.to_string(),
    };
    let mut parts = line.split_whitespace();
    if parts.next() != Some("bestmove") {
        return Err(malformed());
    }
    let text = parts.next().ok_or_else(malformed)?;
    if text == "(none)" || text == "0000" {
        return Err(EngineError::NoMove);
    }
    let mv = text.parse::<Move>().map_err(|_| malformed())?;
    let ponder = match (parts.next(), parts.next()) {
        (Some("ponder"), Some(p)) => p.parse::<Move>().ok(),
        _ => None,
    };
    Ok(EngineMove { mv, ponder })
}
