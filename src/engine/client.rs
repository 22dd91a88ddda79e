//! Subprocess client for an external UCI engine.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::error::EngineError;
use super::protocol::{parse_reply, EngineCommand, EngineMove, EngineReply};
use crate::sync::StopFlag;

/// Poll interval while waiting for the process to exit
const EXIT_POLL_MS: u64 = 10;
/// How often a wait for engine output checks the stop flag
const STOP_POLL_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EngineState {
    NotStarted,
    Handshaking,
    Ready,
    Searching,
    Closed,
}

/// Live process handles; present only between a successful spawn and close.
struct Process {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<std::io::Result<String>>,
    reader: JoinHandle<()>,
}

/// Drives one engine process through
/// `NotStarted -> Handshaking -> Ready -> Searching -> Ready -> ... -> Closed`.
///
/// Every wait is bounded by the configured timeouts, and cut short once an
/// attached [`StopFlag`] is raised. A client can be started again after it
/// was closed. Dropping the client closes it.
pub struct EngineClient {
    config: EngineConfig,
    state: EngineState,
    process: Option<Process>,
    stop: Option<StopFlag>,
}

impl EngineClient {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        EngineClient {
            config,
            state: EngineState::NotStarted,
            process: None,
            stop: None,
        }
    }

    /// Abandon any wait for engine output with [`EngineError::Stopped`]
    /// once `stop` is raised.
    #[must_use]
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = Some(stop);
        self
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Spawn the engine and complete the `uci`/`uciok`, `isready`/`readyok`
    /// handshake.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.process.is_some() {
            return Err(EngineError::NotReady { state: self.state });
        }
        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| EngineError::Spawn {
                program: self.config.program.clone(),
                kind: err.kind(),
                message: err.to_string(),
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::Exited);
            }
        };

        let (tx, lines) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("engine-stdout".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let failed = line.is_err();
                    if tx.send(line).is_err() || failed {
                        break;
                    }
                }
            });
        let reader = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::io(&err));
            }
        };

        info!("started engine '{}' (pid {})", self.config.program, child.id());
        self.process = Some(Process {
            child,
            stdin,
            lines,
            reader,
        });
        self.state = EngineState::Handshaking;

        if let Err(err) = self.handshake() {
            self.close();
            return Err(err);
        }
        self.state = EngineState::Ready;
        Ok(())
    }

    fn handshake(&mut self) -> Result<(), EngineError> {
        let timeout = self.config.handshake_timeout;
        self.send(&EngineCommand::Uci)?;
        self.wait_for("uciok", timeout, |reply| {
            matches!(reply, EngineReply::UciOk).then_some(())
        })?;
        self.sync_ready()
    }

    fn sync_ready(&mut self) -> Result<(), EngineError> {
        let timeout = self.config.handshake_timeout;
        self.send(&EngineCommand::IsReady)?;
        self.wait_for("readyok", timeout, |reply| {
            matches!(reply, EngineReply::ReadyOk).then_some(())
        })
    }

    /// Tell the engine a new game starts.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.ensure_ready()?;
        self.send(&EngineCommand::UciNewGame)?;
        let result = self.sync_ready();
        if result.is_err() {
            self.close();
        }
        result
    }

    /// Ask for the best move in the position given as FEN.
    ///
    /// On any failure the process is closed, so a late `bestmove` can never
    /// be mistaken for the answer to a later request.
    pub fn best_move(&mut self, fen: &str) -> Result<EngineMove, EngineError> {
        self.ensure_ready()?;
        self.state = EngineState::Searching;
        let result = self.search(fen);
        match &result {
            Ok(found) => {
                debug!("engine chose {}", found.mv);
                self.state = EngineState::Ready;
            }
            Err(EngineError::NoMove) => self.state = EngineState::Ready,
            Err(_) => self.close(),
        }
        result
    }

    fn search(&mut self, fen: &str) -> Result<EngineMove, EngineError> {
        let depth = self.config.search_depth;
        let timeout = self.config.search_timeout;
        self.send(&EngineCommand::Position { fen })?;
        self.send(&EngineCommand::Go { depth })?;
        self.wait_for("bestmove", timeout, |reply| match reply {
            EngineReply::BestMove(result) => Some(result),
            _ => None,
        })?
    }

    /// Send `quit`, wait a bounded time for the process to exit, kill it
    /// otherwise, and release the pipes. Idempotent.
    pub fn close(&mut self) {
        let Some(process) = self.process.take() else {
            self.state = EngineState::Closed;
            return;
        };
        let Process {
            mut child,
            mut stdin,
            lines,
            reader,
        } = process;

        let _ = writeln!(stdin, "{}", EngineCommand::Quit).and_then(|()| stdin.flush());
        drop(stdin);

        let deadline = Instant::now() + self.config.quit_timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!("engine exited with {status}");
                    break;
                }
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(EXIT_POLL_MS));
                }
                Ok(None) | Err(_) => {
                    warn!("engine did not exit after quit, killing it");
                    let _ = child.kill();
                    let _ = child.wait();
                    break;
                }
            }
        }

        drop(lines);
        let _ = reader.join();
        self.state = EngineState::Closed;
        info!("engine closed");
    }

    fn ensure_ready(&self) -> Result<(), EngineError> {
        match self.state {
            EngineState::Ready if self.process.is_some() => Ok(()),
            state => Err(EngineError::NotReady { state }),
        }
    }

    fn send(&mut self, command: &EngineCommand<'_>) -> Result<(), EngineError> {
        let process = self.process.as_mut().ok_or(EngineError::NotReady {
            state: self.state,
        })?;
        debug!("> {command}");
        writeln!(process.stdin, "{command}")
            .and_then(|()| process.stdin.flush())
            .map_err(|err| EngineError::io(&err))
    }

    /// Read lines until `accept` picks one, or until `timeout` elapses.
    fn wait_for<T>(
        &self,
        waiting_for: &'static str,
        timeout: Duration,
        mut accept: impl FnMut(EngineReply) -> Option<T>,
    ) -> Result<T, EngineError> {
        let process = self.process.as_ref().ok_or(EngineError::NotReady {
            state: self.state,
        })?;
        let deadline = Instant::now() + timeout;
        loop {
            if self.stop.as_ref().is_some_and(StopFlag::is_stopped) {
                return Err(EngineError::Stopped);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            let slice = remaining.min(Duration::from_millis(STOP_POLL_MS));
            match process.lines.recv_timeout(slice) {
                Ok(Ok(line)) => {
                    debug!("< {line}");
                    if let Some(value) = accept(parse_reply(&line)) {
                        return Ok(value);
                    }
                }
                Ok(Err(err)) => return Err(EngineError::io(&err)),
                Err(RecvTimeoutError::Timeout) if Instant::now() < deadline => {}
                Err(RecvTimeoutError::Timeout) => {
                    return Err(EngineError::Timeout {
                        waiting_for,
                        after: timeout,
                    })
                }
                Err(RecvTimeoutError::Disconnected) => return Err(EngineError::Exited),
            }
        }
    }
}

impl Drop for EngineClient {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_fails_to_spawn() {
        let mut client = EngineClient::new(EngineConfig::new("/nonexistent/chess-engine-binary"));
        let err = client.start().unwrap_err();
        assert!(matches!(err, EngineError::Spawn { .. }));
        assert_eq!(client.state(), EngineState::NotStarted);
    }

    #[test]
    fn test_search_before_start_is_refused() {
        let mut client = EngineClient::new(EngineConfig::default());
        assert_eq!(
            client.best_move("8/8/8/8/8/8/8/K1k5 w - - 0 1"),
            Err(EngineError::NotReady {
                state: EngineState::NotStarted
            })
        );
    }

    #[test]
    fn test_close_without_process_is_harmless() {
        let mut client = EngineClient::new(EngineConfig::default());
        client.close();
        client.close();
        assert_eq!(client.state(), EngineState::Closed);
    }
}
