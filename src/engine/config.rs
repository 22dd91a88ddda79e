use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENGINE_PROGRAM: &str = "stockfish";
pub const DEFAULT_SEARCH_DEPTH: u32 = 15;

/// How to launch the external engine and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Program to run, looked up on `PATH` when not a path
    pub program: String,
    pub args: Vec<String>,
    /// Depth sent with `go depth`
    pub search_depth: u32,
    /// Bound on `uci`/`uciok` and `isready`/`readyok`
    pub handshake_timeout: Duration,
    /// Bound on `go`/`bestmove`
    pub search_timeout: Duration,
    /// How long to wait for the process to exit after `quit` before killing it
    pub quit_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_ENGINE_PROGRAM.to_string(),
            args: Vec::new(),
            search_depth: DEFAULT_SEARCH_DEPTH,
            handshake_timeout: Duration::from_secs(10),
            search_timeout: Duration::from_secs(60),
            quit_timeout: Duration::from_secs(2),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_search_depth(mut self, depth: u32) -> Self {
        self.search_depth = depth.max(1);
        self
    }

    #[must_use]
    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_quit_timeout(mut self, timeout: Duration) -> Self {
        self.quit_timeout = timeout;
        self
    }
}
