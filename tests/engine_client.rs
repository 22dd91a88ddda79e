//! The UCI client and session against scripted stand-in engines.

#![cfg(unix)]

use std::thread;
use std::time::{Duration, Instant};

use chess_arbiter::engine::{
    EngineClient, EngineConfig, EngineError, EngineState, EngineWorker, SearchRequest,
    SearchTicket,
};
use chess_arbiter::game::{Game, START_FEN};
use chess_arbiter::sync::StopFlag;
use chess_arbiter::session::{EngineTurn, Session, SessionConfig};
use chess_arbiter::{Color, Move, Square};

/// A shell script speaking just enough UCI; `go` is answered with `$BEST`.
fn scripted_engine(best: &str) -> EngineConfig {
    let script = format!(
        r#"while read -r line; do
  case "$line" in
    uci) echo "id name scripted"; echo uciok ;;
    isready) echo readyok ;;
    go*) echo "info depth 1 score cp 0"; echo "{best}" ;;
    quit) exit 0 ;;
  esac
done"#
    );
    short_timeouts(EngineConfig::new("sh").with_args(["-c".to_string(), script]))
}

fn short_timeouts(config: EngineConfig) -> EngineConfig {
    config
        .with_search_depth(3)
        .with_handshake_timeout(Duration::from_secs(5))
        .with_search_timeout(Duration::from_secs(5))
        .with_quit_timeout(Duration::from_millis(500))
}

/// Completes the handshake but never answers `go`.
fn thinking_forever() -> EngineConfig {
    let script = r#"while read -r line; do
  case "$line" in
    uci) echo uciok ;;
    isready) echo readyok ;;
    quit) exit 0 ;;
  esac
done"#;
    EngineConfig::new("sh")
        .with_args(["-c", script])
        .with_handshake_timeout(Duration::from_secs(5))
        .with_search_timeout(Duration::from_secs(60))
        .with_quit_timeout(Duration::from_millis(500))
}

fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

#[test]
fn handshake_then_best_move() {
    let mut client = EngineClient::new(scripted_engine("bestmove e2e4 ponder e7e5"));
    client.start().expect("handshake should succeed");
    assert_eq!(client.state(), EngineState::Ready);

    client.new_game().unwrap();
    let found = client.best_move(START_FEN).unwrap();
    assert_eq!(found.mv, mv("e2e4"));
    assert_eq!(found.ponder, Some(mv("e7e5")));
    assert_eq!(client.state(), EngineState::Ready);

    client.close();
    assert_eq!(client.state(), EngineState::Closed);
}

#[test]
fn no_move_keeps_client_ready() {
    let mut client = EngineClient::new(scripted_engine("bestmove (none)"));
    client.start().unwrap();
    assert_eq!(client.best_move(START_FEN), Err(EngineError::NoMove));
    assert_eq!(client.state(), EngineState::Ready);
}

#[test]
fn malformed_bestmove_closes_client() {
    let mut client = EngineClient::new(scripted_engine("bestmove zz"));
    client.start().unwrap();
    let err = client.best_move(START_FEN).unwrap_err();
    assert!(matches!(err, EngineError::MalformedReply { .. }), "{err:?}");
    assert_eq!(client.state(), EngineState::Closed);

    // A closed client can be started again.
    client.start().unwrap();
    assert_eq!(client.state(), EngineState::Ready);
}

#[test]
fn silent_engine_times_out() {
    let config = EngineConfig::new("sh")
        .with_args(["-c", "while read -r line; do :; done"])
        .with_handshake_timeout(Duration::from_millis(200))
        .with_quit_timeout(Duration::from_millis(200));
    let mut client = EngineClient::new(config);
    let err = client.start().unwrap_err();
    assert!(
        matches!(err, EngineError::Timeout { waiting_for: "uciok", .. }),
        "{err:?}"
    );
    assert_eq!(client.state(), EngineState::Closed);
}

#[test]
fn engine_that_exits_is_reported() {
    let config = EngineConfig::new("sh")
        .with_args(["-c", "read -r line; exit 0"])
        .with_handshake_timeout(Duration::from_secs(5));
    let mut client = EngineClient::new(config);
    let err = client.start().unwrap_err();
    assert!(
        matches!(err, EngineError::Exited | EngineError::Io { .. }),
        "{err:?}"
    );
}

#[test]
fn session_plays_engine_reply() {
    let mut session = Session::new(SessionConfig {
        engine_side: Some(Color::Black),
        engine: scripted_engine("bestmove e7e5"),
        ..SessionConfig::default()
    })
    .unwrap();

    assert!(!session.request_engine_move_if_due());
    session.submit(sq("e2"), sq("e4"), None).unwrap();
    assert!(session.request_engine_move_if_due());
    assert!(session.is_engine_thinking());
    assert!(!session.request_engine_move_if_due());

    match session.wait_engine(Duration::from_secs(10)) {
        Some(EngineTurn::Played(report)) => {
            assert_eq!(report.played, mv("e7e5"));
            assert_eq!(report.mover, Color::Black);
        }
        other => panic!("expected an engine move, got {other:?}"),
    }
    assert_eq!(session.game().side_to_move(), Color::White);
    assert_eq!(session.engine_status(), Some(EngineState::Ready));
}

#[test]
fn session_rejects_illegal_engine_move() {
    let mut session = Session::new(SessionConfig {
        engine_side: Some(Color::Black),
        engine: scripted_engine("bestmove e7e4"),
        ..SessionConfig::default()
    })
    .unwrap();

    session.submit(sq("d2"), sq("d4"), None).unwrap();
    assert!(session.request_engine_move_if_due());
    match session.wait_engine(Duration::from_secs(10)) {
        Some(EngineTurn::Rejected { mv: played, .. }) => assert_eq!(played, mv("e7e4")),
        other => panic!("expected a rejection, got {other:?}"),
    }
    assert_eq!(session.game().side_to_move(), Color::Black);
}

#[test]
fn session_discards_reply_after_human_moves_for_engine() {
    let script = r#"while read -r line; do
  case "$line" in
    uci) echo uciok ;;
    isready) echo readyok ;;
    go*) sleep 0.3; echo "bestmove e7e5" ;;
    quit) exit 0 ;;
  esac
done"#;
    let mut session = Session::new(SessionConfig {
        engine_side: Some(Color::Black),
        engine: short_timeouts(EngineConfig::new("sh").with_args(["-c", script])),
        ..SessionConfig::default()
    })
    .unwrap();

    session.submit(sq("e2"), sq("e4"), None).unwrap();
    assert!(session.request_engine_move_if_due());
    session.submit(sq("c7"), sq("c5"), None).unwrap();
    assert!(!session.is_engine_thinking());

    let fen = session.game().to_fen();
    assert_eq!(
        session.wait_engine(Duration::from_secs(10)),
        Some(EngineTurn::Stale)
    );
    assert_eq!(session.game().to_fen(), fen);
}

#[test]
fn session_new_game_makes_pending_reply_stale() {
    let mut session = Session::new(SessionConfig {
        engine_side: Some(Color::White),
        engine: scripted_engine("bestmove e2e4"),
        ..SessionConfig::default()
    })
    .unwrap();

    assert!(session.request_engine_move_if_due());
    session.new_game();
    assert_eq!(
        session.wait_engine(Duration::from_secs(10)),
        Some(EngineTurn::Stale)
    );
    assert_eq!(session.game().to_fen(), START_FEN);

    assert!(session.request_engine_move_if_due());
    match session.wait_engine(Duration::from_secs(10)) {
        Some(EngineTurn::Played(report)) => assert_eq!(report.played, mv("e2e4")),
        other => panic!("expected an engine move, got {other:?}"),
    }
}

#[test]
fn stop_flag_cuts_search_short() {
    let stop = StopFlag::new();
    let mut client = EngineClient::new(thinking_forever()).with_stop_flag(stop.clone());
    client.start().unwrap();

    let remote = stop.clone();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        remote.stop();
    });
    let started = Instant::now();
    assert_eq!(client.best_move(START_FEN), Err(EngineError::Stopped));
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(client.state(), EngineState::Closed);
    stopper.join().unwrap();
}

#[test]
fn worker_shutdown_does_not_wait_out_a_search() {
    let mut worker = EngineWorker::spawn(thinking_forever()).unwrap();
    let game = Game::new();
    worker
        .request(SearchRequest {
            ticket: SearchTicket {
                generation: 0,
                position: game.position_token(),
            },
            fen: game.to_fen(),
        })
        .unwrap();
    thread::sleep(Duration::from_millis(300));

    let started = Instant::now();
    worker.shutdown();
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(worker.status(), EngineState::Closed);
}
