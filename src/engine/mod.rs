//! External engine support: a UCI client for a subprocess engine and a
//! worker thread that runs it off the game's thread.

mod client;
mod config;
mod error;
mod protocol;
mod worker;

pub use client::{EngineClient, EngineState};
pub use config::{EngineConfig, DEFAULT_ENGINE_PROGRAM, DEFAULT_SEARCH_DEPTH};
pub use error::EngineError;
pub use protocol::{parse_bestmove, parse_reply, EngineCommand, EngineMove, EngineReply};
pub use worker::{EngineWorker, SearchReply, SearchRequest, SearchTicket};
