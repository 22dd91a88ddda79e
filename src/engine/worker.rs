//! Background thread that owns the [`EngineClient`].
//!
//! The worker never sees a `Game`: it receives FEN strings tagged with a
//! [`SearchTicket`] and answers with the same ticket, leaving it to the
//! owner of the game to decide whether the answer still applies.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error};
use parking_lot::Mutex;

use super::client::{EngineClient, EngineState};
use super::config::EngineConfig;
use super::error::EngineError;
use super::protocol::EngineMove;
use crate::game::PositionToken;
use crate::sync::StopFlag;

/// How often an idle worker checks its stop flag
const IDLE_POLL_MS: u64 = 50;

/// Which game and position a search was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchTicket {
    /// Bumped on every new game
    pub generation: u64,
    pub position: PositionToken,
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub ticket: SearchTicket,
    pub fen: String,
}

#[derive(Debug, Clone)]
pub struct SearchReply {
    pub ticket: SearchTicket,
    pub result: Result<EngineMove, EngineError>,
}

pub struct EngineWorker {
    requests: Option<Sender<SearchRequest>>,
    replies: Receiver<SearchReply>,
    stop: StopFlag,
    status: Arc<Mutex<EngineState>>,
    handle: Option<JoinHandle<()>>,
}

impl EngineWorker {
    /// Start the worker thread. The engine process itself is launched
    /// lazily on the first request and relaunched after a failure.
    pub fn spawn(config: EngineConfig) -> Result<Self, EngineError> {
        let (request_tx, request_rx) = mpsc::channel::<SearchRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<SearchReply>();
        let stop = StopFlag::new();
        let status = Arc::new(Mutex::new(EngineState::NotStarted));

        let thread_stop = stop.clone();
        let thread_status = Arc::clone(&status);
        let handle = thread::Builder::new()
            .name("engine-worker".to_string())
            .spawn(move || {
                worker_loop(config, &request_rx, &reply_tx, &thread_stop, &thread_status);
            })
            .map_err(|err| EngineError::io(&err))?;

        Ok(EngineWorker {
            requests: Some(request_tx),
            replies: reply_rx,
            stop,
            status,
            handle: Some(handle),
        })
    }

    /// Queue a search.
    pub fn request(&self, request: SearchRequest) -> Result<(), EngineError> {
        self.requests
            .as_ref()
            .ok_or(EngineError::Exited)?
            .send(request)
            .map_err(|_| EngineError::Exited)
    }

    /// A finished search, if one is waiting.
    #[must_use]
    pub fn try_reply(&self) -> Option<SearchReply> {
        match self.replies.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block up to `timeout` for a finished search.
    #[must_use]
    pub fn wait_reply(&self, timeout: Duration) -> Option<SearchReply> {
        self.replies.recv_timeout(timeout).ok()
    }

    /// Last known state of the engine process.
    #[must_use]
    pub fn status(&self) -> EngineState {
        *self.status.lock()
    }

    /// Stop the worker, close the engine and join the thread.
    pub fn shutdown(&mut self) {
        self.stop.stop();
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EngineWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    config: EngineConfig,
    requests: &Receiver<SearchRequest>,
    replies: &Sender<SearchReply>,
    stop: &StopFlag,
    status: &Mutex<EngineState>,
) {
    let mut client = EngineClient::new(config).with_stop_flag(stop.clone());
    let mut generation = None;

    while !stop.is_stopped() {
        let request = match requests.recv_timeout(Duration::from_millis(IDLE_POLL_MS)) {
            Ok(request) => newest_request(request, requests),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        debug!("search requested at ply {}", request.ticket.position.ply);

        let result = serve(&mut client, &mut generation, &request);
        match &result {
            Err(EngineError::Stopped) => debug!("search abandoned for shutdown"),
            Err(err) => error!("engine request failed: {err}"),
            Ok(_) => {}
        }
        *status.lock() = client.state();

        let reply = SearchReply {
            ticket: request.ticket,
            result,
        };
        if replies.send(reply).is_err() {
            break;
        }
    }

    client.close();
    *status.lock() = client.state();
    debug!("engine worker stopped");
}

/// Skip requests that a later one has already superseded.
fn newest_request(first: SearchRequest, requests: &Receiver<SearchRequest>) -> SearchRequest {
    let mut newest = first;
    let mut skipped = 0;
    while let Ok(next) = requests.try_recv() {
        newest = next;
        skipped += 1;
    }
    if skipped > 0 {
        debug!("skipped {skipped} superseded search request(s)");
    }
    newest
}

fn serve(
    client: &mut EngineClient,
    generation: &mut Option<u64>,
    request: &SearchRequest,
) -> Result<EngineMove, EngineError> {
    if client.state() != EngineState::Ready {
        client.start()?;
        *generation = None;
    }
    if *generation != Some(request.ticket.generation) {
        client.new_game()?;
        *generation = Some(request.ticket.generation);
    }
    client.best_move(&request.fen)
}
