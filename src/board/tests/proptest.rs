//! Property-based tests using proptest.
//!
//! Each case plays a random game from the initial position, choosing
//! among the legal moves with a seeded RNG.

use proptest::prelude::*;
use rand::prelude::*;

use crate::board::Color;
use crate::game::{parse_fen, Game};

fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

fn ply_strategy() -> impl Strategy<Value = usize> {
    1..=60usize
}

/// Play up to `plies` random legal moves, calling `check` after each one.
fn random_game(seed: u64, plies: usize, mut check: impl FnMut(&mut Game)) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new();
    for _ in 0..plies {
        let moves = game.legal_moves();
        let Some(&mv) = moves.choose(&mut rng) else {
            break;
        };
        game.play(mv).expect("generated move must be accepted");
        check(&mut game);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Testing a candidate never changes the position.
    #[test]
    fn prop_simulation_leaves_board_identical(seed in seed_strategy(), plies in ply_strategy()) {
        random_game(seed, plies, |game| {
            let side = game.side_to_move();
            let last = game.last_move();
            let mut board = game.board().clone();
            let before = board.clone();
            for mv in board.pseudo_legal_moves(side, last) {
                let _ = board.is_move_legal(mv, side, last);
                assert_eq!(board, before, "testing {mv} changed the board");
            }
        });
    }

    /// The side that just moved is never left in check.
    #[test]
    fn prop_mover_never_in_check(seed in seed_strategy(), plies in ply_strategy()) {
        random_game(seed, plies, |game| {
            let mover: Color = game.side_to_move().opponent();
            assert!(!game.board().is_king_in_check(mover));
        });
    }

    /// Generated moves start on one of the mover's pieces and go somewhere.
    #[test]
    fn prop_generated_moves_are_well_formed(seed in seed_strategy(), plies in ply_strategy()) {
        random_game(seed, plies, |game| {
            let side = game.side_to_move();
            for mv in game.board().pseudo_legal_moves(side, game.last_move()) {
                assert_ne!(mv.from, mv.to);
                assert_eq!(game.board().color_on(mv.from), Some(side));
                assert_ne!(game.board().color_on(mv.to), Some(side));
            }
        });
    }

    /// FEN export and re-import describe the same position.
    #[test]
    fn prop_fen_round_trip(seed in seed_strategy(), plies in ply_strategy()) {
        random_game(seed, plies, |game| {
            let fen = game.to_fen();
            let reloaded = parse_fen(&fen).expect("exported FEN must parse");
            assert_eq!(reloaded.to_fen(), fen);
            assert_eq!(reloaded.fingerprint(), game.fingerprint());
        });
    }

    /// Grid and identity index agree after every move.
    #[test]
    fn prop_store_stays_consistent(seed in seed_strategy(), plies in ply_strategy()) {
        random_game(seed, plies, |game| game.board().assert_consistent());
    }
}
