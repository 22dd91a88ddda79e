//! Benchmarks for the rules engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_arbiter::game::{parse_fen, Game, START_FEN};
use chess_arbiter::zobrist::Fingerprint;
use chess_arbiter::Move;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");

    for (name, fen) in [
        ("startpos", START_FEN),
        ("middlegame", MIDDLEGAME),
        ("kiwipete", KIWIPETE),
    ] {
        let game = parse_fen(fen).unwrap();
        let mut board = game.board().clone();
        let side = game.side_to_move();
        let last = game.last_move();
        group.bench_function(name, |b| {
            b.iter(|| black_box(board.legal_moves(side, last)))
        });
    }

    group.finish();
}

fn bench_play(c: &mut Criterion) {
    let mut group = c.benchmark_group("play");

    let opening: Vec<Move> = ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"]
        .iter()
        .map(|m| m.parse().unwrap())
        .collect();
    group.bench_function("italian_with_castling", |b| {
        b.iter(|| {
            let mut game = Game::new();
            for &mv in &opening {
                game.play(black_box(mv)).unwrap();
            }
            game
        })
    });

    let game = parse_fen(KIWIPETE).unwrap();
    group.bench_function("kiwipete_single_move", |b| {
        b.iter(|| {
            let mut game = game.clone();
            game.play(black_box("e2a6".parse().unwrap())).unwrap()
        })
    });

    group.finish();
}

fn bench_notation(c: &mut Criterion) {
    let mut group = c.benchmark_group("notation");

    for (name, fen) in [("startpos", START_FEN), ("kiwipete", KIWIPETE)] {
        group.bench_with_input(BenchmarkId::new("parse_fen", name), &fen, |b, fen| {
            b.iter(|| parse_fen(black_box(fen)).unwrap())
        });
        let game = parse_fen(fen).unwrap();
        group.bench_with_input(BenchmarkId::new("to_fen", name), &game, |b, game| {
            b.iter(|| black_box(game.to_fen()))
        });
        group.bench_with_input(BenchmarkId::new("fingerprint", name), &game, |b, game| {
            b.iter(|| black_box(Fingerprint::of(game.board(), game.side_to_move())))
        });
    }

    group.finish();
}

fn bench_terminal(c: &mut Criterion) {
    let mut group = c.benchmark_group("terminal");

    let positions = [
        (
            "checkmate",
            "r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4",
        ),
        ("stalemate", "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"),
        ("open", MIDDLEGAME),
    ];

    for (name, fen) in positions {
        let game = parse_fen(fen).unwrap();
        let mut board = game.board().clone();
        let side = game.side_to_move();
        let last = game.last_move();
        group.bench_function(name, |b| {
            b.iter(|| {
                black_box(board.is_checkmate(side, last));
                black_box(board.is_stalemate_or_dead(side, last))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_legal_moves,
    bench_play,
    bench_notation,
    bench_terminal
);
criterion_main!(benches);
