use serde::Deserialize;

use chess_arbiter::game::{parse_fen, DrawReason, Game, GameResult, START_FEN};
use chess_arbiter::{Color, Move};

#[derive(Deserialize)]
struct ScenarioSet {
    scenarios: Vec<Scenario>,
}

#[derive(Deserialize)]
struct Scenario {
    name: String,
    #[serde(default)]
    start: Option<String>,
    moves: Vec<String>,
    fen: String,
    #[serde(default)]
    result: Option<String>,
}

fn expected_result(name: &str) -> GameResult {
    match name {
        "white_mates" => GameResult::Checkmate {
            winner: Color::White,
        },
        "black_mates" => GameResult::Checkmate {
            winner: Color::Black,
        },
        "stalemate" => GameResult::Draw(DrawReason::Stalemate),
        "insufficient_material" => GameResult::Draw(DrawReason::InsufficientMaterial),
        "repetition" => GameResult::Draw(DrawReason::Repetition),
        "move_limit" => GameResult::Draw(DrawReason::MoveLimit),
        other => panic!("unknown result '{other}' in scenarios.json"),
    }
}

fn load() -> Vec<Scenario> {
    let data = include_str!("data/scenarios.json");
    let set: ScenarioSet = serde_json::from_str(data).expect("invalid scenarios.json");
    set.scenarios
}

#[test]
fn scenario_suite() {
    for scenario in load() {
        let start = scenario.start.as_deref().unwrap_or(START_FEN);
        let mut game = parse_fen(start)
            .unwrap_or_else(|err| panic!("{}: bad start FEN: {err}", scenario.name));

        for text in &scenario.moves {
            let mv: Move = text
                .parse()
                .unwrap_or_else(|err| panic!("{}: bad move {text}: {err}", scenario.name));
            if let Err(rejection) = game.play(mv) {
                panic!("{}: {text} rejected: {rejection}", scenario.name);
            }
        }

        assert_eq!(game.to_fen(), scenario.fen, "{}", scenario.name);
        let expected = scenario.result.as_deref().map(expected_result);
        assert_eq!(game.outcome(), expected, "{}", scenario.name);
    }
}

#[test]
fn finished_scenarios_refuse_further_moves() {
    for scenario in load().into_iter().filter(|s| s.result.is_some()) {
        let mut game = parse_fen(&scenario.fen)
            .unwrap_or_else(|err| panic!("{}: bad final FEN: {err}", scenario.name));
        // Repetition needs the move history, which a FEN does not carry.
        if scenario.result.as_deref() == Some("repetition") {
            assert!(!game.is_ended(), "{}", scenario.name);
            continue;
        }
        assert!(game.is_ended(), "{}: reloaded game should be over", scenario.name);
        assert!(game.legal_moves().is_empty(), "{}", scenario.name);
    }
}

#[test]
fn replaying_from_exported_fen_matches_direct_play() {
    let mut direct = Game::new();
    let mut resumed: Option<Game> = None;
    for (i, text) in ["d2d4", "d7d5", "c2c4", "d5c4", "e2e3", "b7b5"].iter().enumerate() {
        let mv: Move = text.parse().unwrap();
        direct.play(mv).unwrap();
        if let Some(game) = resumed.as_mut() {
            game.play(mv).unwrap();
        }
        if i == 2 {
            resumed = Some(parse_fen(&direct.to_fen()).unwrap());
        }
    }
    let resumed = resumed.unwrap();
    assert_eq!(resumed.to_fen(), direct.to_fen());
    assert_eq!(resumed.fingerprint(), direct.fingerprint());
    assert_eq!(resumed.fullmove_number(), direct.fullmove_number());
}
