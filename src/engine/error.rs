use std::fmt;
use std::io;
use std::time::Duration;

use super::client::EngineState;

/// Failure talking to the external engine. Every variant means the current
/// turn gets no engine move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine program could not be started
    Spawn {
        program: String,
        kind: io::ErrorKind,
        message: String,
    },
    /// Reading from or writing to the engine's pipes failed
    Io { kind: io::ErrorKind, message: String },
    /// The engine did not answer in time
    Timeout {
        waiting_for: &'static str,
        after: Duration,
    },
    /// The engine closed its output
    Exited,
    /// A `bestmove` line that could not be understood
    MalformedReply { line: String },
    /// The engine reported that it has no move (`bestmove (none)` or `0000`)
    NoMove,
    /// A request was made in a state that cannot serve it
    NotReady { state: EngineState },
    /// The wait was abandoned because the owner is shutting down
    Stopped,
}

impl EngineError {
    pub(crate) fn io(err: &io::Error) -> Self {
        EngineError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Spawn { program, message, .. } => {
                write!(f, "Failed to start engine '{program}': {message}")
            }
            EngineError::Io { message, .. } => write!(f, "Engine I/O error: {message}"),
            EngineError::Timeout { waiting_for, after } => {
                write!(f, "Engine did not send '{waiting_for}' within {after:?}")
            }
            EngineError::Exited => write!(f, "Engine exited unexpectedly"),
            EngineError::MalformedReply { line } => {
                write!(f, "Malformed engine reply '{line}'")
            }
            EngineError::NoMove => write!(f, "Engine has no move in this position"),
            EngineError::NotReady { state } => {
                write!(f, "Engine is not ready (state: {state:?})")
            }
            EngineError::Stopped => write!(f, "Engine wait cancelled by shutdown"),
        }
    }
}

impl std::error::Error for EngineError {}
