//! Console front end: play against an external UCI engine from a terminal.
//!
//! Environment:
//! - `CHESS_ENGINE` - engine program (default `stockfish`)
//! - `CHESS_ENGINE_DEPTH` - search depth (default 15)
//! - `CHESS_ENGINE_SIDE` - `white`, `black` (default) or `none`
//! - `CHESS_LOG` - log level for stderr (default `info`)

use std::io::{self, BufRead, Write};
use std::time::Duration;

use chess_arbiter::board::{Board, Color, Move, Square};
use chess_arbiter::engine::EngineConfig;
use chess_arbiter::game::{GameEvent, MoveReport};
use chess_arbiter::logging;
use chess_arbiter::session::{EngineTurn, Session, SessionConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
enum ConsoleCommand {
    Play(Move),
    Moves(Option<Square>),
    Fen,
    Board,
    NewGame,
    Go,
    Help,
    Quit,
    Unknown(String),
}

fn parse_console_command(line: &str) -> Option<ConsoleCommand> {
    let trimmed = line.trim();
    let mut parts = trimmed.split_whitespace();
    let first = parts.next()?;
    let cmd = match first {
        "moves" => match parts.next() {
            None => ConsoleCommand::Moves(None),
            Some(s) => match s.parse::<Square>() {
                Ok(sq) => ConsoleCommand::Moves(Some(sq)),
                Err(_) => ConsoleCommand::Unknown(trimmed.to_string()),
            },
        },
        "fen" => ConsoleCommand::Fen,
        "board" => ConsoleCommand::Board,
        "new" => ConsoleCommand::NewGame,
        "go" => ConsoleCommand::Go,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => match other.parse::<Move>() {
            Ok(mv) => ConsoleCommand::Play(mv),
            Err(_) => ConsoleCommand::Unknown(trimmed.to_string()),
        },
    };
    Some(cmd)
}

fn parse_side(value: Option<&str>) -> Option<Color> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("white" | "w") => Some(Color::White),
        Some("none" | "off") => None,
        _ => Some(Color::Black),
    }
}

fn config_from_env() -> SessionConfig {
    let mut engine = EngineConfig::default();
    if let Ok(program) = std::env::var("CHESS_ENGINE") {
        engine.program = program;
    }
    if let Some(depth) = std::env::var("CHESS_ENGINE_DEPTH")
        .ok()
        .and_then(|d| d.trim().parse().ok())
    {
        engine = engine.with_search_depth(depth);
    }
    SessionConfig {
        engine_side: parse_side(std::env::var("CHESS_ENGINE_SIDE").ok().as_deref()),
        engine,
        ..SessionConfig::default()
    }
}

fn render_board(board: &Board) -> String {
    let mut out = String::new();
    for rank in (0..8u8).rev() {
        out.push_str(&format!("{} ", rank + 1));
        for file in 0..8u8 {
            let c = Square::new(file, rank)
                .and_then(|sq| board.piece_at(sq))
                .map_or('.', |p| p.to_fen_char());
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h");
    out
}

fn print_report(report: &MoveReport) {
    println!("{} played {}", report.mover, report.played);
    for event in &report.events {
        match event {
            GameEvent::SideToMoveChanged(color) => println!("{color} to move"),
            GameEvent::CheckAsserted(color) => println!("{color} is in check"),
            GameEvent::GameEnded(result) => println!("Game over: {result}"),
        }
    }
}

fn print_help() {
    println!("Enter moves as e2e4 or e7e8q.");
    println!("  moves [square]  list legal moves");
    println!("  board | fen     show the position");
    println!("  go              let the engine move now");
    println!("  new             start a new game");
    println!("  quit            leave");
}

fn main() {
    if let Err(err) = logging::init() {
        eprintln!("logging disabled: {err}");
    }

    let config = config_from_env();
    let engine_wait =
        config.engine.handshake_timeout * 2 + config.engine.search_timeout + Duration::from_secs(1);
    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("failed to start: {err}");
            std::process::exit(1);
        }
    };

    println!("{}", render_board(session.game().board()));
    print_help();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut engine_enabled = true;

    loop {
        if engine_enabled
            && (session.request_engine_move_if_due() || session.is_engine_thinking())
        {
            println!("Engine is thinking...");
            match session.wait_engine(engine_wait) {
                Some(EngineTurn::Played(report)) => {
                    print_report(&report);
                    println!("{}", render_board(session.game().board()));
                    continue;
                }
                Some(EngineTurn::NoMove(err)) => println!("Engine produced no move: {err}"),
                Some(EngineTurn::Rejected { mv, rejection }) => {
                    println!("Engine move {mv} rejected: {rejection}");
                }
                Some(EngineTurn::Stale) => continue,
                None => println!("Engine did not answer in time"),
            }
            println!("Enter a move, or 'go' to ask the engine again.");
            engine_enabled = false;
        }

        print!("> ");
        let _ = io::stdout().flush();
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let Some(command) = parse_console_command(&line) else {
            continue;
        };
        engine_enabled = true;

        match command {
            ConsoleCommand::Play(mv) => match session.submit(mv.from, mv.to, mv.promotion) {
                Ok(report) => {
                    print_report(&report);
                    println!("{}", render_board(session.game().board()));
                }
                Err(rejection) => println!("Illegal move: {rejection}"),
            },
            ConsoleCommand::Moves(square) => {
                let moves = match square {
                    Some(sq) => session.legal_moves_from(sq),
                    None => session.legal_moves(),
                };
                let text: Vec<String> = moves.iter().map(ToString::to_string).collect();
                println!("{}", text.join(" "));
            }
            ConsoleCommand::Fen => println!("{}", session.game().to_fen()),
            ConsoleCommand::Board => println!("{}", render_board(session.game().board())),
            ConsoleCommand::NewGame => {
                session.new_game();
                println!("{}", render_board(session.game().board()));
            }
            ConsoleCommand::Go => {}
            ConsoleCommand::Help => print_help(),
            ConsoleCommand::Quit => break,
            ConsoleCommand::Unknown(text) => println!("Unknown command '{text}' (try 'help')"),
        }
    }
}
